/// How a command finished once it ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// Output was produced, but the input carried a reported failure
    /// (a `{ error }` report, failed mapping fields, a missed path).
    Reported,
}

impl CommandStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Reported => 1,
        }
    }
}
