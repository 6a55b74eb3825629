//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (open_db, paths) plus init/import/reset
//! - `entities` - Client, project, time entry and rate commands
//! - `reports` - Report generation commands
//! - `settings` - Engine settings commands
//! - `transactions` - Transaction commands (add, list, pay, cancel, delete)

pub mod core;
pub mod entities;
pub mod reports;
pub mod settings;
pub mod transactions;

// Re-export command functions for main.rs
pub use core::*;
pub use entities::*;
pub use reports::*;
pub use settings::*;
pub use transactions::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Format minor currency units as reais, e.g. 123456 -> "R$ 1.234,56"
pub fn format_brl(value: i64) -> String {
    let negative = value < 0;
    let abs = value.unsigned_abs();
    let reais = abs / 100;
    let centavos = abs % 100;

    // Thousands separator on the integer part
    let digits = reais.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if negative {
        format!("-R$ {},{:02}", grouped, centavos)
    } else {
        format!("R$ {},{:02}", grouped, centavos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(0), "R$ 0,00");
        assert_eq!(format_brl(5), "R$ 0,05");
        assert_eq!(format_brl(123_456), "R$ 1.234,56");
        assert_eq!(format_brl(100_000_000), "R$ 1.000.000,00");
        assert_eq!(format_brl(-123_456), "-R$ 1.234,56");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer description", 10), "a longe...");
    }
}
