use std::fmt;
use std::sync::RwLock;

use colored::Colorize;
use once_cell::sync::Lazy;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OutputPreferences {
    pub quiet_mode: bool,
    pub plain: bool,
}

static PREFERENCES: Lazy<RwLock<OutputPreferences>> =
    Lazy::new(|| RwLock::new(OutputPreferences::default()));

pub fn set_preferences(prefs: OutputPreferences) {
    if let Ok(mut guard) = PREFERENCES.write() {
        *guard = prefs;
    }
}

fn preferences() -> OutputPreferences {
    PREFERENCES.read().map(|guard| *guard).unwrap_or_default()
}

fn emit(kind: MessageKind, message: impl fmt::Display) {
    let prefs = preferences();
    if prefs.quiet_mode && kind == MessageKind::Info {
        return;
    }
    let text = message.to_string();
    let line = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        MessageKind::Info => text,
        MessageKind::Success => format!("[\u{2713}] {text}"),
        MessageKind::Warning => format!("[!] {text}"),
        MessageKind::Error => format!("[x] {text}"),
    };
    if prefs.plain {
        println!("{line}");
        return;
    }
    let styled = match kind {
        MessageKind::Section => line.bold().to_string(),
        MessageKind::Info => line,
        MessageKind::Success => line.green().to_string(),
        MessageKind::Warning => line.yellow().to_string(),
        MessageKind::Error => line.red().to_string(),
    };
    println!("{styled}");
}

pub fn info(message: impl fmt::Display) {
    emit(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    emit(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    emit(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    emit(MessageKind::Error, message);
}

pub fn section(message: impl fmt::Display) {
    emit(MessageKind::Section, message);
}
