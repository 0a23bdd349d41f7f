//! Basic usage example for the typed ini parser
//!
//! Declares a small schema, parses a document with a multi-line list, and
//! reads the typed values back. The `user` section is then deserialized into
//! a struct.

use serde::Deserialize;
use typed_ini::{IniError, Parser, ParserConfig};

#[derive(Debug, Deserialize)]
struct User {
    name: String,
    level: u64,
    factors: Vec<f64>,
}

fn main() -> Result<(), IniError> {
    let mut parser = Parser::with_config(ParserConfig::new().with_comment_char(';'));

    let global = parser.add_section("global");
    let verbose = global.add_bool("verbose");

    let user = parser.add_section("user");
    let name = user.add_string("name");
    let level = user.add_uint64("level");
    let factors = user.add_float64_list("factors");

    let text = r#"
; hi there
[global]
verbose = true

[user]
 name=Frank
level= 37
factors = [
; Initially easy
10, 20,

; But gradually much harder
23.5, "38.25",
]
"#;

    let store = parser.parse_str(text)?;
    println!("global.verbose = {}", verbose.bool_val(&store));
    println!("user.name = {}", name.string_val(&store));
    println!("user.level = {}", level.uint64_val(&store));
    println!("user.factors = {:?}", factors.float64_list_val(&store));

    match parser.deserialize_section::<User>(&store, "user") {
        Ok(user) => println!("Deserialized: {:?}", user),
        Err(e) => println!("Deserialization failed: {}", e),
    }

    // Errors carry the line and the section they occurred in
    if let Err(e) = parser.parse_str("[user]\nlevel = -1\n") {
        println!("Expected error: {}", e);
    }

    Ok(())
}
