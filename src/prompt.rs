//! Interactive front-end: asks for whatever the command line left out

use crate::cli::Args;
use crate::config::{Mode, RunRequest};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question` and read one line, without its line ending. End of
    /// input reads as an empty answer.
    pub fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    pub fn container(&mut self) -> io::Result<String> {
        let container = self.ask("Please input the container name: ")?;
        writeln!(self.output, "You chose the container: {:?}", container)?;
        Ok(container)
    }

    pub fn local_dir(&mut self) -> io::Result<PathBuf> {
        let dir = self.ask("Please input the localDir to save: ")?;
        writeln!(self.output, "{:?} has been chosen", dir)?;
        Ok(PathBuf::from(dir))
    }

    pub fn mode(&mut self) -> io::Result<Mode> {
        let selector = self.ask(
            "Please choose one func: \n1.save object to local.\n2.save URL list to local.\ninput:",
        )?;
        Ok(Mode::from_selector(&selector))
    }
}

/// Combine command-line flags with prompted answers, in prompt order:
/// container, local directory, mode.
pub fn resolve_request<R: BufRead, W: Write>(
    args: &Args,
    prompter: &mut Prompter<R, W>,
) -> io::Result<RunRequest> {
    let container = match &args.container {
        Some(container) => container.clone(),
        None => prompter.container()?,
    };
    let container = container.trim().to_string();
    if container.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "container name must not be empty",
        ));
    }

    let local_dir = match &args.dir {
        Some(dir) => dir.clone(),
        None => prompter.local_dir()?,
    };
    // An empty answer means the working directory
    let local_dir = if local_dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        local_dir
    };

    let mode = match args.mode {
        Some(mode) => mode,
        None => prompter.mode()?,
    };

    Ok(RunRequest {
        container,
        local_dir,
        mode,
    })
}
