use std::fmt;

/// Controls which output sinks are live for the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Printer {
    Default,
    Quiet,
    Verbose,
}

impl Printer {
    /// Return the [`Stdout`] sink for this printer.
    pub(crate) fn stdout(self) -> Stdout {
        match self {
            Self::Quiet => Stdout::Disabled,
            Self::Default | Self::Verbose => Stdout::Enabled,
        }
    }

    /// Return the [`Stderr`] sink for this printer.
    pub(crate) fn stderr(self) -> Stderr {
        match self {
            Self::Quiet => Stderr::Disabled,
            Self::Default | Self::Verbose => Stderr::Enabled,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Stdout {
    Enabled,
    Disabled,
}

impl fmt::Write for Stdout {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match self {
            Self::Enabled => {
                anstream::print!("{s}");
            }
            Self::Disabled => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Stderr {
    Enabled,
    Disabled,
}

impl fmt::Write for Stderr {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match self {
            Self::Enabled => {
                anstream::eprint!("{s}");
            }
            Self::Disabled => {}
        }
        Ok(())
    }
}
