use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::BTreeMap;

// 签名算法：HMAC-SHA256(app_secret, api_name + 排序后的参数拼接)，结果转为大写十六进制

/// 系统参数中`sign_method`的取值
pub const SIGN_METHOD: &str = "sha256";

/// 返回大写的十六进制HMAC-SHA256签名
pub fn sign_hmac_sha256(secret: &str, str_to_sign: &str) -> String {
    type HmacSha256 = Hmac<Sha256>;
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(str_to_sign.as_bytes());
    let res = mac.finalize().into_bytes();
    hex::encode_upper(res)
}

/// 合并系统参数和应用参数，key相同时应用参数覆盖系统参数
///
/// 返回的BTreeMap已经按key的字节序排好序
pub fn merge_params<'a>(
    sys_params: &'a BTreeMap<String, String>,
    api_params: &'a BTreeMap<String, String>,
) -> BTreeMap<&'a str, &'a str> {
    sys_params
        .iter()
        .chain(api_params.iter())
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}

/// 待签名字符串：api_name + 排序后的 key1value1key2value2...
pub fn canonical_string(api_name: &str, sorted_params: &BTreeMap<&str, &str>) -> String {
    let mut s = String::from(api_name);
    for (k, v) in sorted_params {
        s.push_str(k);
        s.push_str(v);
    }
    s
}

// 签名入口
pub fn sign_api_request(
    app_secret: &str,
    api_name: &str,
    sys_params: &BTreeMap<String, String>,
    api_params: &BTreeMap<String, String>,
) -> String {
    let merged = merge_params(sys_params, api_params);
    let str_to_sign = canonical_string(api_name, &merged);
    sign_hmac_sha256(app_secret, &str_to_sign)
}
