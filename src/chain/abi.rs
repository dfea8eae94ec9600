//! Just enough Solidity ABI to talk to ERC-20 metadata getters and the
//! storage contract: `string` arguments, `string`/`uint8` returns and the
//! `(address,string)` record.

use crate::core::{
    Address, ClientError, ClientResult, GET_DATA_SELECTOR, SET_KEY_DATA_SELECTOR,
};

const WORD: usize = 32;

fn word_from_usize(value: usize) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

fn word_from_address(address: &Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[12..].copy_from_slice(&address.to_bytes());
    word
}

/// Length word followed by the bytes, right-padded to a word boundary.
fn encode_bytes_tail(bytes: &[u8]) -> Vec<u8> {
    let padded = (bytes.len() + WORD - 1) / WORD * WORD;
    let mut out = Vec::with_capacity(WORD + padded);
    out.extend_from_slice(&word_from_usize(bytes.len()));
    out.extend_from_slice(bytes);
    out.resize(WORD + padded, 0);
    out
}

/// Call data for a function taking a single `string`.
pub fn encode_string_call(selector: [u8; 4], value: &str) -> Vec<u8> {
    let mut out = selector.to_vec();
    out.extend_from_slice(&word_from_usize(WORD));
    out.extend(encode_bytes_tail(value.as_bytes()));
    out
}

pub fn encode_get_data(key: &str) -> Vec<u8> {
    encode_string_call(GET_DATA_SELECTOR, key)
}

/// Call data for `setKeyData(string,(address,string))`.
pub fn encode_set_key_data(key: &str, owner: &Address, info: &str) -> Vec<u8> {
    let key_tail = encode_bytes_tail(key.as_bytes());

    let mut record = Vec::new();
    record.extend_from_slice(&word_from_address(owner));
    record.extend_from_slice(&word_from_usize(2 * WORD));
    record.extend(encode_bytes_tail(info.as_bytes()));

    let mut out = SET_KEY_DATA_SELECTOR.to_vec();
    out.extend_from_slice(&word_from_usize(2 * WORD));
    out.extend_from_slice(&word_from_usize(2 * WORD + key_tail.len()));
    out.extend(key_tail);
    out.extend(record);
    out
}

fn read_word(data: &[u8], offset: usize) -> ClientResult<&[u8]> {
    offset
        .checked_add(WORD)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| ClientError::AbiDecode(format!("no word at offset {}", offset)))
}

fn read_usize(data: &[u8], offset: usize) -> ClientResult<usize> {
    let word = read_word(data, offset)?;
    if word[..WORD - 8].iter().any(|b| *b != 0) {
        return Err(ClientError::AbiDecode(format!(
            "value at offset {} does not fit in usize",
            offset
        )));
    }
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&word[WORD - 8..]);
    usize::try_from(u64::from_be_bytes(tail))
        .map_err(|_| ClientError::AbiDecode("offset overflow".to_string()))
}

fn read_string_at(data: &[u8], start: usize) -> ClientResult<String> {
    let len = read_usize(data, start)?;
    let body = start + WORD;
    let bytes = body
        .checked_add(len)
        .and_then(|end| data.get(body..end))
        .ok_or_else(|| ClientError::AbiDecode("string runs past end of data".to_string()))?;
    String::from_utf8(bytes.to_vec())
        .map_err(|e| ClientError::AbiDecode(format!("invalid UTF-8 string: {}", e)))
}

/// Decodes a `string` return value.
///
/// Some old tokens return `bytes32` instead; those are accepted and trimmed
/// of trailing zero bytes.
pub fn decode_string(data: &[u8]) -> ClientResult<String> {
    if data.len() == WORD {
        let end = data.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        return String::from_utf8(data[..end].to_vec())
            .map_err(|e| ClientError::AbiDecode(format!("invalid bytes32 string: {}", e)));
    }
    let offset = read_usize(data, 0)?;
    read_string_at(data, offset)
}

pub fn decode_uint8(data: &[u8]) -> ClientResult<u8> {
    let word = read_word(data, 0)?;
    if word[..WORD - 1].iter().any(|b| *b != 0) {
        return Err(ClientError::AbiDecode("value does not fit in uint8".to_string()));
    }
    Ok(word[WORD - 1])
}

/// Decodes the `(address,string)` record returned by `getData(string)`.
pub fn decode_address_string(data: &[u8]) -> ClientResult<(Address, String)> {
    let record = read_usize(data, 0)?;
    let address_word = read_word(data, record)?;
    let mut raw = [0u8; 20];
    raw.copy_from_slice(&address_word[12..]);
    let string_start = record
        .checked_add(read_usize(data, record + WORD)?)
        .ok_or_else(|| ClientError::AbiDecode("string offset overflow".to_string()))?;
    let info = read_string_at(data, string_start)?;
    Ok((Address::from_bytes(&raw), info))
}

/// Return data of `getData(string)` for the given record.
#[cfg(test)]
pub(crate) fn encode_record(owner: &Address, info: &str) -> Vec<u8> {
    let mut out = word_from_usize(WORD).to_vec();
    out.extend_from_slice(&word_from_address(owner));
    out.extend_from_slice(&word_from_usize(2 * WORD));
    out.extend(encode_bytes_tail(info.as_bytes()));
    out
}

pub fn to_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

pub fn from_hex(input: &str) -> ClientResult<Vec<u8>> {
    let trimmed = input.strip_prefix("0x").unwrap_or(input);
    hex::decode(trimmed).map_err(|e| ClientError::AbiDecode(format!("invalid hex: {}", e)))
}
