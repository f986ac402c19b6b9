use std::fmt::Debug;
use thiserror::Error;

#[inline(always)]
fn split_and_trim<const BY: char>(line: &str) -> impl Iterator<Item = &str> {
    line.split(BY)
        .map(|field| field.trim())
        .filter(|field| !field.is_empty())
}

/// Decodes `%XX` escapes. Malformed escapes are kept verbatim.
pub fn percent_decode(value: &str) -> String {
    if !value.contains('%') {
        return value.to_string();
    }

    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'%' && idx + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[idx + 1]), hex_value(bytes[idx + 2])) {
                out.push((hi << 4) | lo);
                idx += 3;
                continue;
            }
        }
        out.push(bytes[idx]);
        idx += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

#[inline(always)]
fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

/// Column 9 of a GFF3 line.
///
/// Keys keep file order; each key maps to its comma-separated values,
/// decoded and sorted.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Attributes {
    pairs: Vec<(String, Vec<String>)>,
}

impl Attributes {
    pub fn parse(line: &str) -> Result<Attributes, ParseError> {
        let line = line.trim_end();
        if line.is_empty() || line == "." {
            return Ok(Attributes::default());
        }

        let mut pairs: Vec<(String, Vec<String>)> = Vec::new();
        for field in split_and_trim::<';'>(line) {
            let (key, raw) = match field.split_once('=') {
                Some((key, raw)) => (key.trim(), raw.trim()),
                None => (field, ""),
            };
            if key.is_empty() {
                return Err(ParseError::MissingKey(field.to_string()));
            }

            let mut values = raw
                .split(',')
                .filter(|v| !v.is_empty())
                .map(percent_decode)
                .collect::<Vec<_>>();
            values.sort();

            let key = percent_decode(key);
            match pairs.iter_mut().find(|(k, _)| *k == key) {
                Some((_, existing)) => {
                    existing.extend(values);
                    existing.sort();
                }
                None => pairs.push((key, values)),
            }
        }

        Ok(Attributes { pairs })
    }

    /// All values of `key`, or `None` if the key is absent.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// First value of `key`, if the key is present and carries one.
    #[inline(always)]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn id(&self) -> Option<&str> {
        self.first("ID").filter(|id| !id.is_empty())
    }

    pub fn parents(&self) -> &[String] {
        self.get("Parent").unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    // Attribute without a key, e.g. "=value"
    #[error("Attribute without key: {0}")]
    MissingKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gff() {
        let line = "ID=gene:AT1G01010;Name=NAC001;biotype=protein_coding";
        let attr = Attributes::parse(line).unwrap();
        assert_eq!(attr.id(), Some("gene:AT1G01010"));
        assert_eq!(attr.first("Name"), Some("NAC001"));
        assert_eq!(attr.first("biotype"), Some("protein_coding"));
        assert!(attr.first("gene_id").is_none());
    }

    #[test]
    fn test_multiple_values_sorted() {
        let attr = Attributes::parse("ID=exon1;Parent=tx2,tx1").unwrap();
        assert_eq!(attr.parents(), ["tx1".to_string(), "tx2".to_string()]);
    }

    #[test]
    fn test_url_escapes_decoded() {
        let attr = Attributes::parse("ID=g1;Note=a%3Bb%2Cc%20d;Name=x%2").unwrap();
        assert_eq!(attr.first("Note"), Some("a;b,c d"));
        assert_eq!(attr.first("Name"), Some("x%2"));
    }

    #[test]
    fn test_key_without_value() {
        let attr = Attributes::parse("ID=g1;Dbxref;Name=").unwrap();
        assert!(attr.contains("Dbxref"));
        assert_eq!(attr.first("Dbxref"), None);
        assert_eq!(attr.first("Name"), None);
    }

    #[test]
    fn test_trailing_separator_and_spaces() {
        let attr = Attributes::parse("ID=g1; Name=ABC1 ;").unwrap();
        assert_eq!(attr.first("Name"), Some("ABC1"));
    }

    #[test]
    fn test_missing_key() {
        assert_eq!(
            Attributes::parse("=oops"),
            Err(ParseError::MissingKey("=oops".to_string()))
        );
    }

    #[test]
    fn test_empty_column() {
        assert!(Attributes::parse(".").unwrap().is_empty());
    }
}
