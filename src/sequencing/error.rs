use thiserror::Error;

/// Errors produced while compiling MML or rhythm patterns.
///
/// Compilation is all-or-nothing: on error no events are produced and the
/// sequencer keeps whatever score it had before.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A character that cannot start or continue any MML token.
    #[error("Unexpected character '{character}' at {position} in MML\n{input}\n{}", caret(.position))]
    UnexpectedCharacter {
        character: char,
        /// Character index (not byte offset) into `input`.
        position: usize,
        input: String,
    },

    /// A character that is neither a hit, a rest nor a separator.
    #[error("Unexpected step '{character}' at {position} in track {track}\n{input}\n{}", caret(.position))]
    UnexpectedStep {
        track: usize,
        character: char,
        position: usize,
        /// The offending track's pattern.
        input: String,
    },
}

impl CompileError {
    pub fn position(&self) -> usize {
        match self {
            CompileError::UnexpectedCharacter { position, .. }
            | CompileError::UnexpectedStep { position, .. } => *position,
        }
    }

    pub fn character(&self) -> char {
        match self {
            CompileError::UnexpectedCharacter { character, .. }
            | CompileError::UnexpectedStep { character, .. } => *character,
        }
    }
}

/// Spaces up to `position` followed by a caret.
fn caret(position: &usize) -> String {
    let mut line = " ".repeat(*position);
    line.push('^');
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_points_at_position() {
        let err = CompileError::UnexpectedCharacter {
            character: 'X',
            position: 1,
            input: "CX".to_string(),
        };
        assert_eq!(err.to_string(), "Unexpected character 'X' at 1 in MML\nCX\n ^");
    }

    #[test]
    fn test_step_message_names_track() {
        let err = CompileError::UnexpectedStep {
            track: 2,
            character: '?',
            position: 3,
            input: "x-x?".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected step '?' at 3 in track 2\nx-x?\n   ^"
        );
        assert_eq!(err.position(), 3);
        assert_eq!(err.character(), '?');
    }
}
