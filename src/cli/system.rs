//! `flowio system` - reboot and factory reset

use std::io::{self, BufRead, Write};

use crate::cli::SystemActionArgs;
use crate::session::ConsoleSession;
use crate::system::{run_action, SystemAction};

/// Accept `y`/`yes` in any case; anything else declines.
pub fn is_confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn confirm(question: &str) -> io::Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_confirmed(&answer))
}

pub async fn handle_system_action(
    session: &ConsoleSession,
    action: SystemAction,
    args: &SystemActionArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    if !args.yes && !confirm(action.confirmation(args.target))? {
        return Ok("Cancelled.".to_string());
    }
    let message = run_action(session.device().as_ref(), args.target, action).await?;
    Ok(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_confirmed() {
        assert!(is_confirmed("y\n"));
        assert!(is_confirmed(" YES "));
        assert!(!is_confirmed(""));
        assert!(!is_confirmed("no"));
        assert!(!is_confirmed("yep"));
    }
}
