//! Per-field annotation parsing.
//!
//! A field's raw tag uses host struct-tag syntax (`key:"value" other:"value"`).
//! The value under the configured annotation key is a comma separated list:
//! the property name first, then flags.

/// Default annotation key looked up in field tags.
pub const DEFAULT_TAG_KEY: &str = "pulumi";

/// Prefix of the explicit reference override flag.
const REF_PREFIX: &str = "ref=";

/// Parsed annotation of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyOptions {
    /// Property name emitted into the schema.
    pub name: String,
    /// The property may be absent; only legal on pointer fields.
    pub optional: bool,
    /// Changing the property replaces the resource.
    pub replaces: bool,
    /// Input-only property.
    pub input: bool,
    /// Output-only property; only legal on resources.
    pub output: bool,
    /// Explicit reference target, used verbatim instead of the computed name.
    pub reference: String,
}

/// Parse a raw field tag into property options.
///
/// Returns `None` when the tag carries no annotation under `key`. Unknown
/// flags are ignored so that newer annotations do not break older tools;
/// validating the name and flag usage is left to the caller, which knows
/// the field's context.
pub fn parse_property_options(tag: &str, key: &str) -> Option<PropertyOptions> {
    let value = lookup_tag(tag, key)?;

    let mut segments = value.split(',');
    let mut opts = PropertyOptions {
        name: segments.next().unwrap_or_default().to_string(),
        ..PropertyOptions::default()
    };
    for flag in segments {
        match flag {
            "optional" => opts.optional = true,
            "replaces" => opts.replaces = true,
            "in" => opts.input = true,
            "out" => opts.output = true,
            _ => {
                if let Some(reference) = flag.strip_prefix(REF_PREFIX) {
                    opts.reference = reference.to_string();
                }
            }
        }
    }
    Some(opts)
}

/// Look up `key` in a struct tag of the form `k1:"v1" k2:"v2"`.
///
/// A malformed tag stops the scan and reports the key as absent.
pub fn lookup_tag(tag: &str, key: &str) -> Option<String> {
    let mut rest = tag;
    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return None;
        }

        // Key runs up to the colon; spaces, quotes and control characters end it early.
        let key_len = rest
            .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\u{7f}')
            .unwrap_or(rest.len());
        if key_len == 0 || !rest[key_len..].starts_with(":\"") {
            return None;
        }
        let name = &rest[..key_len];
        rest = &rest[key_len + 1..];

        let (quoted, remainder) = split_quoted(rest)?;
        rest = remainder;
        if name == key {
            return unquote(quoted);
        }
    }
}

/// Split a leading double-quoted string (quotes included) off `s`.
fn split_quoted(s: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some((&s[..=i], &s[i + 1..])),
            _ => {}
        }
    }
    None
}

/// Unquote a double-quoted host string literal.
///
/// Byte escapes (`\x`, octal) above 0x7f would produce invalid UTF-8 and are rejected.
fn unquote(quoted: &str) -> Option<String> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next()? {
            'a' => '\u{7}',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{b}',
            '\\' => '\\',
            '"' => '"',
            'x' => ascii_byte(hex_value(&mut chars, 2)?)?,
            'u' => char::from_u32(hex_value(&mut chars, 4)?)?,
            'U' => char::from_u32(hex_value(&mut chars, 8)?)?,
            first @ '0'..='7' => {
                let mut value = first.to_digit(8)?;
                for _ in 0..2 {
                    value = value * 8 + chars.next()?.to_digit(8)?;
                }
                ascii_byte(value)?
            }
            _ => return None,
        };
        out.push(escaped);
    }
    Some(out)
}

/// Read exactly `digits` hex digits.
fn hex_value(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<u32> {
    let mut value = 0;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

fn ascii_byte(value: u32) -> Option<char> {
    u8::try_from(value)
        .ok()
        .filter(u8::is_ascii)
        .map(char::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(tag: &str) -> Option<PropertyOptions> {
        parse_property_options(tag, DEFAULT_TAG_KEY)
    }

    #[test]
    fn no_annotation_key() {
        assert_eq!(parse(""), None);
        assert_eq!(parse(r#"json:"name""#), None);
    }

    #[test]
    fn name_only() {
        let opts = parse(r#"pulumi:"name""#).unwrap();
        assert_eq!(opts.name, "name");
        assert!(!opts.optional && !opts.replaces && !opts.input && !opts.output);
        assert!(opts.reference.is_empty());
    }

    #[test]
    fn all_flags() {
        let opts = parse(r#"pulumi:"size,optional,replaces,in,out,ref=aws:s3:Bucket""#).unwrap();
        assert_eq!(
            opts,
            PropertyOptions {
                name: "size".into(),
                optional: true,
                replaces: true,
                input: true,
                output: true,
                reference: "aws:s3:Bucket".into(),
            }
        );
    }

    #[test]
    fn unknown_flags_ignored() {
        let opts = parse(r#"pulumi:"tags,secret,optional""#).unwrap();
        assert_eq!(opts.name, "tags");
        assert!(opts.optional);
    }

    #[test]
    fn empty_name_is_still_present() {
        let opts = parse(r#"pulumi:",optional""#).unwrap();
        assert!(opts.name.is_empty());
        assert!(opts.optional);

        let opts = parse(r#"pulumi:"""#).unwrap();
        assert!(opts.name.is_empty());
    }

    #[test]
    fn annotation_among_other_keys() {
        let opts = parse(r#"json:"x,omitempty" pulumi:"x,out" yaml:"x""#).unwrap();
        assert_eq!(opts.name, "x");
        assert!(opts.output);
    }

    #[test]
    fn custom_key() {
        let opts = parse_property_options(r#"schema:"id""#, "schema").unwrap();
        assert_eq!(opts.name, "id");
        assert_eq!(parse_property_options(r#"schema:"id""#, DEFAULT_TAG_KEY), None);
    }

    #[test]
    fn lookup_tag_unescapes() {
        assert_eq!(
            lookup_tag(r#"doc:"say \"hi\"""#, "doc").as_deref(),
            Some(r#"say "hi""#)
        );
    }

    #[test]
    fn lookup_tag_numeric_escapes() {
        assert_eq!(
            lookup_tag(r#"pulumi:"caf\u00e9""#, "pulumi").as_deref(),
            Some("café")
        );
        assert_eq!(
            lookup_tag(r#"pulumi:"\U0001F600,optional""#, "pulumi").as_deref(),
            Some("\u{1F600},optional")
        );
        assert_eq!(
            lookup_tag(r#"pulumi:"\x41\102\a\v""#, "pulumi").as_deref(),
            Some("AB\u{7}\u{b}")
        );
    }

    #[test]
    fn unicode_escape_in_property_name() {
        let opts = parse(r#"pulumi:"caf\u00e9,out""#).unwrap();
        assert_eq!(opts.name, "café");
        assert!(opts.output);
    }

    #[test]
    fn invalid_escapes_report_absent() {
        assert_eq!(lookup_tag(r#"pulumi:"\q""#, "pulumi"), None);
        assert_eq!(lookup_tag(r#"pulumi:"\xff""#, "pulumi"), None);
        assert_eq!(lookup_tag(r#"pulumi:"\ud800""#, "pulumi"), None);
        assert_eq!(lookup_tag(r#"pulumi:"\u00""#, "pulumi"), None);
    }

    #[test]
    fn malformed_tag_reports_absent() {
        assert_eq!(lookup_tag(r#"pulumi:name"#, "pulumi"), None);
        assert_eq!(lookup_tag(r#"pulumi:"unterminated"#, "pulumi"), None);
        assert_eq!(lookup_tag(r#"json "x" pulumi:"y""#, "pulumi"), None);
    }
}
