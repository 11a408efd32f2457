use std::io::{self, BufRead, Write};

use dialoguer::{theme::ColorfulTheme, Input};

use crate::errors::CliError;

/// How the shell talks to the customer. Script mode reads plain stdin
/// lines, for piping scenarios through the binary in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Mode-aware input helper. Every read returns `Ok(None)` on end of input,
/// which callers treat as a clean shutdown: a closed stdin is the one
/// unrecoverable condition in the machine.
pub struct Prompter {
    mode: CliMode,
    theme: ColorfulTheme,
}

impl Prompter {
    pub fn new(mode: CliMode) -> Self {
        Self {
            mode,
            theme: ColorfulTheme::default(),
        }
    }

    pub fn read_line(&self, prompt: &str) -> Result<Option<String>, CliError> {
        match self.mode {
            CliMode::Interactive => {
                let result = Input::<String>::with_theme(&self.theme)
                    .with_prompt(prompt)
                    .allow_empty(true)
                    .interact_text();
                match result {
                    Ok(line) => Ok(Some(line)),
                    // dialoguer reports a closed stream as an IO error.
                    Err(dialoguer::Error::IO(err))
                        if err.kind() == io::ErrorKind::UnexpectedEof =>
                    {
                        Ok(None)
                    }
                    Err(err) => Err(err.into()),
                }
            }
            CliMode::Script => {
                print!("{prompt}: ");
                io::stdout().flush()?;
                let mut line = String::new();
                if io::stdin().lock().read_line(&mut line)? == 0 {
                    println!();
                    return Ok(None);
                }
                println!();
                Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
            }
        }
    }

    /// The original machine gates every screen change on enter.
    pub fn press_enter(&self) -> Result<Option<()>, CliError> {
        Ok(self.read_line("Press enter to continue")?.map(|_| ()))
    }

    /// Y/N question; anything other than an `n` answer counts as yes, the
    /// way the original prompts behaved.
    pub fn confirm(&self, prompt: &str) -> Result<Option<bool>, CliError> {
        let Some(answer) = self.read_line(prompt)? else {
            return Ok(None);
        };
        Ok(Some(!answer.trim().eq_ignore_ascii_case("n")))
    }
}
