use regex::Regex;
use std::sync::OnceLock;

/// 校验请求地址
///
/// 支持 `ftp`、`http`、`https` 三种协议，可带用户信息、端口、路径和查询串。
/// 协议必须出现在开头，`//host` 或裸域名一律视为无效。
pub fn is_valid_uri(s: &str) -> bool {
    static URI_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = URI_REGEX.get_or_init(|| {
        Regex::new(r"^(ftp|http|https)://(\w+:?\w*@)?(\S+)(:[0-9]+)?(/|/([\w#!:.?+=&%@\-/]))?$")
            .unwrap()
    });

    re.is_match(s)
}
