// src/arguments/mention.rs

//! Chat-platform mention parsers. Each accepts the platform's mention
//! markup (`<#id>`, `<@id>`, `<@!id>`, `<@&id>`) or a bare numeric id.

use crate::{
    arguments::{Argument, ArgumentError},
    core::reader::TokenReader,
    models::ArgValue,
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CHANNEL_RE: Regex = Regex::new(r"^<#(\d+)>$").expect("valid channel regex");
    static ref USER_RE: Regex = Regex::new(r"^<@!?(\d+)>$").expect("valid user regex");
    static ref ROLE_RE: Regex = Regex::new(r"^<@&(\d+)>$").expect("valid role regex");
}

/// Extracts the numeric id from a mention token, or falls back to parsing
/// the whole token as a bare id.
fn extract_id(re: &Regex, token: &str) -> Option<u64> {
    if let Some(caps) = re.captures(token) {
        return caps.get(1).and_then(|id| id.as_str().parse().ok());
    }
    token.parse().ok()
}

/// A channel mention (`<#123>`) or bare channel id.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelArg;

impl Argument for ChannelArg {
    fn parse(&self, reader: &mut TokenReader) -> Result<ArgValue, ArgumentError> {
        let token = reader.next()?;
        extract_id(&CHANNEL_RE, token)
            .map(ArgValue::Channel)
            .ok_or_else(|| ArgumentError::Invalid(format!("'{}' is not a channel", token)))
    }
}

/// A user mention (`<@123>` / `<@!123>`) or bare user id.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserArg;

impl Argument for UserArg {
    fn parse(&self, reader: &mut TokenReader) -> Result<ArgValue, ArgumentError> {
        let token = reader.next()?;
        extract_id(&USER_RE, token)
            .map(ArgValue::User)
            .ok_or_else(|| ArgumentError::Invalid(format!("'{}' is not a user", token)))
    }
}

/// A role mention (`<@&123>`) or bare role id.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleArg;

impl Argument for RoleArg {
    fn parse(&self, reader: &mut TokenReader) -> Result<ArgValue, ArgumentError> {
        let token = reader.next()?;
        extract_id(&ROLE_RE, token)
            .map(ArgValue::Role)
            .ok_or_else(|| ArgumentError::Invalid(format!("'{}' is not a role", token)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(token: &str) -> TokenReader {
        TokenReader::new(vec!["!cmd".to_string(), token.to_string()])
    }

    #[test]
    fn test_channel_mention_and_bare_id() {
        assert_eq!(
            ChannelArg.parse(&mut reader("<#1042>")).unwrap(),
            ArgValue::Channel(1042)
        );
        assert_eq!(
            ChannelArg.parse(&mut reader("1042")).unwrap(),
            ArgValue::Channel(1042)
        );
        assert!(ChannelArg.parse(&mut reader("general")).is_err());
        assert!(ChannelArg.parse(&mut reader("<@1042>")).is_err());
    }

    #[test]
    fn test_user_mention_with_and_without_nickname_marker() {
        assert_eq!(
            UserArg.parse(&mut reader("<@55>")).unwrap(),
            ArgValue::User(55)
        );
        assert_eq!(
            UserArg.parse(&mut reader("<@!55>")).unwrap(),
            ArgValue::User(55)
        );
        assert!(UserArg.parse(&mut reader("<@&55>")).is_err());
    }

    #[test]
    fn test_role_mention() {
        assert_eq!(
            RoleArg.parse(&mut reader("<@&9>")).unwrap(),
            ArgValue::Role(9)
        );
        assert!(RoleArg.parse(&mut reader("<@9>")).is_err());
    }
}
