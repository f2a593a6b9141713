// src/util/helper.rs
use std::io::{self, IsTerminal, Write};

/// Parses ids given as separate arguments or comma-separated, keeping their order
pub fn parse_id_list(items: &[String]) -> Option<Vec<i64>> {
    items
        .iter()
        .flat_map(|item| item.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .ok()
        .filter(|ids| !ids.is_empty())
}

/// Interactive confirmation prompt; anything but y/yes (or a read failure) is a no
pub fn confirm(prompt: &str) -> bool {
    print!("{} (y/N): ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut user_input = String::new();
    if io::stdin().read_line(&mut user_input).is_err() {
        return false;
    }

    matches!(user_input.trim().to_lowercase().as_str(), "y" | "yes")
}

pub fn is_stdout_piped() -> bool {
    !io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case(&["3", "1", "2"], Some(vec![3, 1, 2]))]
    #[case(&["3,1", "2"], Some(vec![3, 1, 2]))]
    #[case(&["1700000000000, 5"], Some(vec![1700000000000, 5]))]
    #[case(&["1", "x"], None)]
    #[case(&[], None)]
    #[case(&[","], None)]
    fn given_id_arguments_when_parse_id_list_then_order_preserved(
        #[case] input: &[&str],
        #[case] expected: Option<Vec<i64>>,
    ) {
        assert_eq!(parse_id_list(&strings(input)), expected);
    }
}
