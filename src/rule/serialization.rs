use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::rule::types::Rule;

/// 逐条解析规则数组，某一条格式错误只影响它自己
pub fn lenient_rules<'de, D>(deserializer: D) -> Result<Option<Vec<Rule>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(values.map(|values| values.into_iter().map(Rule::from_value).collect()))
}

/// 毫秒数：接受整数、浮点数（四舍五入）和数字字符串
pub fn millis<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_u64() {
            Some(ms) => Ok(Some(ms)),
            None => n
                .as_f64()
                .and_then(float_millis)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid milliseconds: {}", n))),
        },
        Some(Value::String(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(float_millis)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid milliseconds: {:?}", text))),
        Some(other) => Err(D::Error::custom(format!("invalid milliseconds: {}", other))),
    }
}

fn float_millis(ms: f64) -> Option<u64> {
    (ms.is_finite() && ms >= 0.0).then(|| ms.round() as u64)
}
