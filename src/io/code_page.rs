//! `$DWGCODEPAGE` to encoding mapping
//!
//! The builder never transcodes (tags arrive as text already); the encoding
//! is reported in the drawing metadata so consumers know what the source
//! bytes were.

use encoding_rs::Encoding;

/// Look up the `encoding_rs` encoding for a DXF code page string.
///
/// Matching is case-insensitive. Blank input yields `None`; unrecognised
/// code pages fall back to Windows-1252, the usual default for legacy
/// drawings.
pub fn encoding_for_code_page(code_page: &str) -> Option<&'static Encoding> {
    let key = code_page.trim().to_ascii_lowercase();
    if key.is_empty() {
        return None;
    }

    let encoding = match key.as_str() {
        "gb2312" | "ansi_936" => encoding_rs::GBK,
        "big5" | "ansi_950" => encoding_rs::BIG5,
        "korean" | "ansi_949" | "johab" => encoding_rs::EUC_KR,
        "ansi_932" | "dos932" => encoding_rs::SHIFT_JIS,

        "dos437" | "dos855" | "dos866" => encoding_rs::IBM866,
        "dos850" | "dos860" | "dos861" | "dos863" | "dos865" => encoding_rs::WINDOWS_1252,
        "dos852" => encoding_rs::WINDOWS_1250,
        "dos857" => encoding_rs::WINDOWS_1254,
        "dos869" => encoding_rs::WINDOWS_1253,

        "ansi_874" => encoding_rs::WINDOWS_874,
        "ansi_1250" => encoding_rs::WINDOWS_1250,
        "ansi_1251" => encoding_rs::WINDOWS_1251,
        "ansi_1253" => encoding_rs::WINDOWS_1253,
        "ansi_1254" => encoding_rs::WINDOWS_1254,
        "ansi_1255" => encoding_rs::WINDOWS_1255,
        "ansi_1256" => encoding_rs::WINDOWS_1256,
        "ansi_1257" => encoding_rs::WINDOWS_1257,
        "ansi_1258" => encoding_rs::WINDOWS_1258,

        "iso8859-2" | "iso_8859-2" => encoding_rs::ISO_8859_2,
        "iso8859-3" | "iso_8859-3" => encoding_rs::ISO_8859_3,
        "iso8859-4" | "iso_8859-4" => encoding_rs::ISO_8859_4,
        "iso8859-5" | "iso_8859-5" => encoding_rs::ISO_8859_5,
        "iso8859-6" | "iso_8859-6" => encoding_rs::ISO_8859_6,
        "iso8859-7" | "iso_8859-7" => encoding_rs::ISO_8859_7,
        "iso8859-8" | "iso_8859-8" => encoding_rs::ISO_8859_8,
        "iso8859-9" | "iso_8859-9" => encoding_rs::WINDOWS_1254,
        "iso8859-10" | "iso_8859-10" => encoding_rs::ISO_8859_10,
        "iso8859-13" | "iso_8859-13" => encoding_rs::ISO_8859_13,
        "iso8859-14" | "iso_8859-14" => encoding_rs::ISO_8859_14,
        "iso8859-15" | "iso_8859-15" => encoding_rs::ISO_8859_15,

        "koi8-r" => encoding_rs::KOI8_R,
        "koi8-u" => encoding_rs::KOI8_U,

        "utf-8" | "utf8" | "unicode" => encoding_rs::UTF_8,

        _ => encoding_rs::WINDOWS_1252,
    };
    Some(encoding)
}
