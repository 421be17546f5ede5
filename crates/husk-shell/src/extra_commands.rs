//! Demonstration commands layered on top of the core set: greetings,
//! an easter egg, and base64 utilities.
//!
//! These show how a front end extends the registry; `register_extras`
//! is kept separate from `register_builtins` so embedders can pick.

use husk_types::error::{HuskError, Result};

use crate::interpreter::{Command, CommandRegistry, Environment};

// ---------------------------------------------------------------------------
// hello
// ---------------------------------------------------------------------------

struct HelloCmd;
impl Command for HelloCmd {
    fn name(&self) -> &str {
        "hello"
    }
    fn about(&self) -> &str {
        "hello [name ...] - Greet the user with a message."
    }
    fn execute(&self, args: &[String], _env: &mut Environment<'_>) -> Result<String> {
        if args.len() < 2 {
            return Ok("Hello. Why don't you tell me your name?".to_string());
        }
        Ok(format!("Hello {}", args[1..].join(" ").trim_end()))
    }
}

// ---------------------------------------------------------------------------
// cow
// ---------------------------------------------------------------------------

struct CowCmd;
impl Command for CowCmd {
    fn name(&self) -> &str {
        "cow"
    }
    fn about(&self) -> &str {
        "cow - What does a cow say?"
    }
    fn execute(&self, _args: &[String], _env: &mut Environment<'_>) -> Result<String> {
        Ok("Moooooo!".to_string())
    }
}

// ---------------------------------------------------------------------------
// secret
// ---------------------------------------------------------------------------

struct SecretCmd;
impl Command for SecretCmd {
    fn name(&self) -> &str {
        "secret"
    }
    fn about(&self) -> &str {
        "secret - A command that is not listed in the help."
    }
    fn hidden(&self) -> bool {
        true
    }
    fn execute(&self, _args: &[String], _env: &mut Environment<'_>) -> Result<String> {
        Ok("The password is: goldfish".to_string())
    }
}

// ---------------------------------------------------------------------------
// base64enc / base64dec
// ---------------------------------------------------------------------------

struct Base64EncCmd;
impl Command for Base64EncCmd {
    fn name(&self) -> &str {
        "base64enc"
    }
    fn about(&self) -> &str {
        "base64enc [string] - Base64 encode a string."
    }
    fn execute(&self, args: &[String], _env: &mut Environment<'_>) -> Result<String> {
        if args.len() == 1 {
            return Ok("No string specified.".to_string());
        }
        Ok(base64_encode(args[1..].join(" ").as_bytes()))
    }
}

struct Base64DecCmd;
impl Command for Base64DecCmd {
    fn name(&self) -> &str {
        "base64dec"
    }
    fn about(&self) -> &str {
        "base64dec [string] - Base64 decode a string."
    }
    fn execute(&self, args: &[String], _env: &mut Environment<'_>) -> Result<String> {
        if args.len() == 1 {
            return Ok("No string specified.".to_string());
        }
        base64_decode(&args[1..].join(" "))
            .map_err(|detail| HuskError::validation("base64dec", detail))
    }
}

const B64_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn base64_encode(data: &[u8]) -> String {
    let mut result = String::new();
    for chunk in data.chunks(3) {
        let b0 = chunk[0] as u32;
        let b1 = chunk.get(1).copied().unwrap_or(0) as u32;
        let b2 = chunk.get(2).copied().unwrap_or(0) as u32;
        let triple = (b0 << 16) | (b1 << 8) | b2;

        result.push(B64_CHARS[((triple >> 18) & 0x3F) as usize] as char);
        result.push(B64_CHARS[((triple >> 12) & 0x3F) as usize] as char);
        if chunk.len() > 1 {
            result.push(B64_CHARS[((triple >> 6) & 0x3F) as usize] as char);
        } else {
            result.push('=');
        }
        if chunk.len() > 2 {
            result.push(B64_CHARS[(triple & 0x3F) as usize] as char);
        } else {
            result.push('=');
        }
    }
    result
}

fn base64_decode(input: &str) -> std::result::Result<String, String> {
    let mut bytes = Vec::new();
    let chars: Vec<u8> = input
        .bytes()
        .filter(|&b| b != b'\n' && b != b'\r')
        .collect();

    for chunk in chars.chunks(4) {
        if chunk.len() < 2 {
            return Err("truncated base64 input".to_string());
        }
        let vals: Vec<u32> = chunk
            .iter()
            .map(|&b| {
                if b == b'=' {
                    return Ok(0u32);
                }
                B64_CHARS
                    .iter()
                    .position(|&c| c == b)
                    .map(|p| p as u32)
                    .ok_or_else(|| format!("invalid base64 char: {}", b as char))
            })
            .collect::<std::result::Result<Vec<_>, String>>()?;

        let triple = (vals[0] << 18)
            | (vals[1] << 12)
            | (vals.get(2).copied().unwrap_or(0) << 6)
            | vals.get(3).copied().unwrap_or(0);

        bytes.push(((triple >> 16) & 0xFF) as u8);
        if chunk.len() > 2 && chunk[2] != b'=' {
            bytes.push(((triple >> 8) & 0xFF) as u8);
        }
        if chunk.len() > 3 && chunk[3] != b'=' {
            bytes.push((triple & 0xFF) as u8);
        }
    }

    String::from_utf8(bytes).map_err(|_| "decoded data is not valid utf-8".to_string())
}

/// Register the demonstration commands.
pub fn register_extras(reg: &mut CommandRegistry) {
    reg.register(Box::new(HelloCmd));
    reg.register(Box::new(CowCmd));
    reg.register(Box::new(SecretCmd));
    reg.register(Box::new(Base64EncCmd));
    reg.register(Box::new(Base64DecCmd));
}
