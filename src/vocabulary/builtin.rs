//! Field table of a stock MWDB instance

use super::FieldEntry;

/// `(name, description, has_subfields, has_subquery)`
type Row = (&'static str, &'static str, bool, bool);

const OBJECT: &[Row] = &[
    ("dhash", "Object identifier (SHA256 for files)", false, false),
    ("tag", "Tag attached to the object", false, false),
    ("comment", "Text of a comment", false, false),
    ("attribute", "Attribute value, addressed by key", true, false),
    ("shared", "Group the object is shared with", false, false),
    ("uploader", "User or group that uploaded the object", false, false),
    ("upload_time", "Time of the first upload", false, false),
    ("upload_count", "Number of distinct uploads", false, false),
    ("parent", "Objects that have a matching parent", false, true),
    ("child", "Objects that have a matching child", false, true),
    ("favorites", "User who marked the object as favorite", false, false),
    ("karton", "Karton analysis identifier", false, false),
    ("comment_author", "Author of a comment", false, false),
];

const FILE: &[Row] = &[
    ("name", "Original file name", false, false),
    ("size", "File size in bytes", false, false),
    ("type", "Detected file type", false, false),
    ("md5", "MD5 digest", false, false),
    ("sha1", "SHA1 digest", false, false),
    ("sha256", "SHA256 digest", false, false),
    ("sha512", "SHA512 digest", false, false),
    ("ssdeep", "ssdeep fuzzy hash", false, false),
    ("crc32", "CRC32 checksum", false, false),
];

const CONFIG: &[Row] = &[
    ("type", "Configuration type (static, dynamic)", false, false),
    ("family", "Malware family", false, false),
    ("cfg", "Configuration contents, addressed by key path", true, false),
];

const TEXT_BLOB: &[Row] = &[
    ("name", "Blob name", false, false),
    ("size", "Blob size in bytes", false, false),
    ("content", "Blob contents", false, false),
    ("first_seen", "Time the blob was first seen", false, false),
    ("last_seen", "Time the blob was last seen", false, false),
    ("type", "Blob type", false, false),
];

fn entries(rows: &[Row]) -> Vec<FieldEntry> {
    rows.iter()
        .map(|&(name, description, has_subfields, has_subquery)| FieldEntry {
            name: name.to_string(),
            description: description.to_string(),
            has_subfields,
            has_subquery,
        })
        .collect()
}

pub(super) fn object() -> Vec<FieldEntry> {
    entries(OBJECT)
}

pub(super) fn file() -> Vec<FieldEntry> {
    entries(FILE)
}

pub(super) fn config() -> Vec<FieldEntry> {
    entries(CONFIG)
}

pub(super) fn text_blob() -> Vec<FieldEntry> {
    entries(TEXT_BLOB)
}
