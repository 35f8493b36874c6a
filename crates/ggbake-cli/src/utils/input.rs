//! User input utilities for interactive command-line prompts.

use anyhow::{Context, Result};
use std::io;

/// Prompts the user for a string input.
///
/// Displays a prompt message and waits for the user to enter text.
/// The input is read from stdin and returned with whitespace trimmed.
pub fn prompt_string(prompt: &str) -> Result<String> {
    println!("{prompt}: ");

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read user input")?;

    Ok(input.trim().to_string())
}

/// Prompts the user for a string input with a default value.
///
/// If the user just presses Enter, the default value is returned.
pub fn prompt_string_with_default(prompt: &str, default: Option<&str>) -> Result<String> {
    if let Some(default_val) = default {
        println!("{prompt} [{default_val}]: ");
    } else {
        println!("{prompt}: ");
    }

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read user input")?;

    let trimmed = input.trim();
    if trimmed.is_empty() {
        Ok(default.unwrap_or("").to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Prompts the user for a yes/no confirmation.
///
/// Accepts 'y', 'yes', 'n', 'no' (case insensitive). Empty input is treated
/// as 'no'.
pub fn prompt_confirmation(prompt: &str) -> Result<bool> {
    loop {
        let input = prompt_string(&format!("{prompt} (y/N)"))?;
        match input.to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" | "" => return Ok(false),
            _ => {
                eprintln!("Please enter 'y' for yes or 'n' for no.");
            }
        }
    }
}

/// Prompts the user to pick one entry from a numbered list.
///
/// Re-prompts until the user enters a valid 1-based index.
pub fn prompt_selection<'a>(prompt: &str, options: &'a [String]) -> Result<&'a str> {
    for (i, option) in options.iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }
    loop {
        let input = prompt_string(prompt)?;
        match input.parse::<usize>() {
            Ok(index) if (1..=options.len()).contains(&index) => {
                return Ok(&options[index - 1]);
            }
            _ => {
                eprintln!("Please enter a number between 1 and {}.", options.len());
            }
        }
    }
}
