use std::fmt;
use std::str::FromStr;

use crate::{ApiRequestsError, Result};
use serde::{Deserialize, Serialize};

/// 支持的 HTTP 方法白名单
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl FromStr for Method {
    type Err = ApiRequestsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            _ => Err(ApiRequestsError::Validation(format!(
                "Invalid HTTP method: {}",
                s
            ))),
        }
    }
}

impl Method {
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Method::parse("get").unwrap(), Method::Get);
        assert_eq!(Method::parse("Put").unwrap(), Method::Put);
        assert_eq!(Method::parse("OPTIONS").unwrap(), Method::Options);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(Method::parse("del").is_err());
        assert!(Method::parse("TRACE").is_err());
        assert!(Method::parse("").is_err());
    }

    #[test]
    fn test_display_is_uppercase() {
        assert_eq!(Method::Patch.to_string(), "PATCH");
        assert_eq!(
            serde_json::to_string(&Method::Delete).unwrap(),
            "\"DELETE\""
        );
    }
}
