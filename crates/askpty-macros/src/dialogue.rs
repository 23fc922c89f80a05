//! `dialogue!` parsing and expansion.

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Expr, Ident, LitChar, LitStr, Result, Token, braced};

/// Keys `key` accepts; must match `askpty::Key`'s unit variants.
const KEYS: &[&str] = &[
    "ArrowUp",
    "ArrowDown",
    "ArrowRight",
    "ArrowLeft",
    "Home",
    "End",
    "Enter",
    "Backspace",
    "Delete",
    "Tab",
    "Escape",
    "Space",
    "CtrlC",
    "CtrlD",
];

/// A parsed command.
pub enum Command {
    /// Type text.
    Send {
        /// Text to type.
        data: LitStr,
        /// Append the line ending.
        newline: bool,
    },
    /// Wait for output.
    Expect {
        /// What to wait for.
        target: ExpectTarget,
        /// Per-step timeout.
        timeout: Option<Expr>,
    },
    /// Press a named key.
    Key(Ident),
    /// Press a control chord, already reduced to its byte.
    Ctrl(u8),
    /// Pause.
    Wait(Expr),
    /// Change the timeout for later expects.
    Timeout(Expr),
}

/// What an expect command waits for.
pub enum ExpectTarget {
    /// Literal text.
    Literal(LitStr),
    /// Regular expression, known to compile.
    Regex(LitStr),
    /// End of file.
    Eof,
}

fn optional_timeout(input: ParseStream) -> Result<Option<Expr>> {
    if input.peek(Token![,]) {
        let _: Token![,] = input.parse()?;
        Ok(Some(input.parse()?))
    } else {
        Ok(None)
    }
}

fn control_byte(lit: &LitChar) -> Result<u8> {
    let c = lit.value().to_ascii_lowercase();
    match c {
        'a'..='z' => Ok(c as u8 - b'a' + 1),
        '[' => Ok(0x1b),
        '\\' => Ok(0x1c),
        ']' => Ok(0x1d),
        '^' => Ok(0x1e),
        '_' => Ok(0x1f),
        _ => Err(syn::Error::new(
            lit.span(),
            format!("no control chord for {c:?}"),
        )),
    }
}

impl Parse for Command {
    fn parse(input: ParseStream) -> Result<Self> {
        let keyword: Ident = input.parse()?;

        match keyword.to_string().as_str() {
            "send" => Ok(Self::Send {
                data: input.parse()?,
                newline: false,
            }),
            "sendln" | "send_line" => Ok(Self::Send {
                data: input.parse()?,
                newline: true,
            }),
            "expect" => {
                let text: LitStr = input.parse()?;
                Ok(Self::Expect {
                    target: ExpectTarget::Literal(text),
                    timeout: optional_timeout(input)?,
                })
            }
            "expect_re" | "expect_regex" => {
                let pattern: LitStr = input.parse()?;
                if let Err(e) = regex::Regex::new(&pattern.value()) {
                    return Err(syn::Error::new(
                        pattern.span(),
                        format!("invalid regex: {e}"),
                    ));
                }
                Ok(Self::Expect {
                    target: ExpectTarget::Regex(pattern),
                    timeout: optional_timeout(input)?,
                })
            }
            "expect_eof" => Ok(Self::Expect {
                target: ExpectTarget::Eof,
                timeout: optional_timeout(input)?,
            }),
            "key" => {
                let name: Ident = input.parse()?;
                if !KEYS.contains(&name.to_string().as_str()) {
                    return Err(syn::Error::new(
                        name.span(),
                        format!("unknown key `{name}`, expected one of: {}", KEYS.join(", ")),
                    ));
                }
                Ok(Self::Key(name))
            }
            "ctrl" => {
                let lit: LitChar = input.parse()?;
                Ok(Self::Ctrl(control_byte(&lit)?))
            }
            "wait" | "sleep" => Ok(Self::Wait(input.parse()?)),
            "timeout" => Ok(Self::Timeout(input.parse()?)),
            other => Err(syn::Error::new(
                keyword.span(),
                format!("unknown dialogue command: {other}"),
            )),
        }
    }
}

/// The `dialogue!` input.
pub struct DialogueInput {
    /// Commands in order.
    pub commands: Punctuated<Command, Token![;]>,
}

impl Parse for DialogueInput {
    fn parse(input: ParseStream) -> Result<Self> {
        // Handle braced or unbraced syntax
        let commands = if input.peek(syn::token::Brace) {
            let content;
            braced!(content in input);
            Punctuated::parse_terminated(&content)?
        } else {
            Punctuated::parse_terminated(input)?
        };

        Ok(Self { commands })
    }
}

fn expand_command(command: Command) -> TokenStream {
    match command {
        Command::Send { data, newline } => {
            if newline {
                quote! { ::askpty::Step::SendLine(::std::string::String::from(#data)) }
            } else {
                quote! { ::askpty::Step::Send(::std::string::String::from(#data)) }
            }
        }
        Command::Expect { target, timeout } => {
            let timeout = timeout.map_or_else(
                || quote! { ::std::option::Option::None },
                |t| quote! { ::std::option::Option::Some(#t) },
            );
            let pattern = match target {
                ExpectTarget::Literal(text) => quote! { ::askpty::Pattern::literal(#text) },
                ExpectTarget::Regex(re) => quote! {
                    ::askpty::Pattern::Regex(
                        ::askpty::__private::Regex::new(#re)
                            .expect("regex was validated at compile time"),
                    )
                },
                ExpectTarget::Eof => quote! { ::askpty::Pattern::Eof },
            };
            quote! {
                ::askpty::Step::Expect {
                    pattern: #pattern,
                    timeout: #timeout,
                }
            }
        }
        Command::Key(name) => quote! { ::askpty::Step::SendKey(::askpty::Key::#name) },
        Command::Ctrl(byte) => quote! { ::askpty::Step::SendKey(::askpty::Key::Control(#byte)) },
        Command::Wait(duration) => quote! { ::askpty::Step::Wait(#duration) },
        Command::Timeout(duration) => quote! { ::askpty::Step::SetTimeout(#duration) },
    }
}

/// Generate the `Dialogue` expression.
pub fn expand(input: DialogueInput) -> TokenStream {
    let steps: Vec<_> = input.commands.into_iter().map(expand_command).collect();

    quote! {
        ::askpty::Dialogue::new(::std::vec![#(#steps),*])
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn parse(tokens: TokenStream) -> Result<DialogueInput> {
        syn::parse2(tokens)
    }

    #[test]
    fn parse_survey_script() {
        let input: DialogueInput = parse_quote! {
            expect "What is your name?";
            sendln "Johnny";
            key ArrowDown;
            ctrl 'c';
            expect_re r"chose (\w+)", std::time::Duration::from_secs(1);
            expect_eof
        };
        assert_eq!(input.commands.len(), 6);
        assert!(matches!(input.commands[3], Command::Ctrl(0x03)));
    }

    #[test]
    fn braced_with_trailing_semicolon() {
        let input = parse(quote! { { send "x"; wait d; } }).unwrap();
        assert_eq!(input.commands.len(), 2);
    }

    #[test]
    fn bad_regex_rejected() {
        let err = parse(quote! { expect_re "(oops" }).err().unwrap();
        assert!(err.to_string().contains("invalid regex"));
    }

    #[test]
    fn unknown_key_rejected() {
        let err = parse(quote! { key PageDown }).err().unwrap();
        assert!(err.to_string().contains("unknown key"));
    }

    #[test]
    fn unknown_command_rejected() {
        let err = parse(quote! { shout "hi" }).err().unwrap();
        assert!(err.to_string().contains("unknown dialogue command"));
    }

    #[test]
    fn expansion_targets_askpty() {
        let input = parse(quote! { sendln "blue"; key Enter }).unwrap();
        let out = expand(input).to_string();
        assert!(out.contains(":: askpty :: Dialogue :: new"));
        assert!(out.contains("SendLine"));
        assert!(out.contains(":: askpty :: Key :: Enter"));
    }
}
