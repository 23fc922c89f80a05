//! askpty-macros: procedural macros for askpty
//!
//! - [`dialogue!`] - write a console script as a list of commands
//!
//! Use it through the `askpty` re-export; the generated code refers to
//! `::askpty` paths.

// In proc-macro crates, passing parsed input by value is idiomatic
#![allow(clippy::needless_pass_by_value)]

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod dialogue;

/// Define a console script.
///
/// Expands to an `askpty::Dialogue`.
///
/// # Commands
///
/// - `expect "text"` - wait for literal output
/// - `expect_re "regex"` - wait for a regex, validated at compile time
/// - `expect_eof` - wait for the program side to close
/// - `send "text"` - type text
/// - `sendln "text"` - type text and the line ending
/// - `key Name` - press a named `askpty::Key`, e.g. `key ArrowDown`
/// - `ctrl 'c'` - press a control chord
/// - `wait <duration>` - pause
/// - `timeout <duration>` - timeout for the expects that follow
///
/// Any expect may take its own timeout after a comma:
/// `expect "slow", Duration::from_secs(60)`.
///
/// # Example
///
/// ```ignore
/// use askpty::dialogue;
/// use std::time::Duration;
///
/// let script = dialogue! {
///     timeout Duration::from_secs(10);
///     expect "What is your name?";
///     sendln "Johnny Appleseed";
///     expect "Choose a color:";
///     key ArrowDown;
///     key Enter;
///     expect_re r"chose \w+";
///     expect_eof
/// };
/// ```
#[proc_macro]
pub fn dialogue(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as dialogue::DialogueInput);
    dialogue::expand(input).into()
}
