use super::*;
use crate::constants::{CREATED_BY, ONE_MIB};
use crate::hasher::PieceDigests;

// ============================================================================
// Extra-field store
// ============================================================================

#[test]
fn test_extra_rejects_reserved_keys() {
    for key in RESERVED_INFO_KEYS {
        let mut extra = ExtraFields::default();
        let result = extra.insert(&format!("{}:value", key));
        assert!(
            matches!(result, Err(MetainfoError::ReservedExtraKey(_))),
            "'{}' must be rejected",
            key
        );
    }
}

#[test]
fn test_extra_rejects_duplicate_key() {
    let mut extra = ExtraFields::default();
    extra.insert("source:first").unwrap();
    assert!(matches!(
        extra.insert("source:second"),
        Err(MetainfoError::DuplicateExtraKey(_))
    ));
    assert_eq!(extra.len(), 1);
}

#[test]
fn test_extra_rejects_bad_syntax() {
    let mut extra = ExtraFields::default();
    assert!(matches!(
        extra.insert("no-colon-here"),
        Err(MetainfoError::ExtraFieldSyntax(_))
    ));
    assert!(matches!(
        extra.insert(":empty-key"),
        Err(MetainfoError::ExtraFieldSyntax(_))
    ));
}

#[test]
fn test_extra_value_may_contain_colons() {
    let mut extra = ExtraFields::default();
    extra.insert("url:http://example.com/x").unwrap();
    let fields = extra.drain_until(None);
    assert_eq!(fields[0].key, "url");
    assert_eq!(fields[0].value, "http://example.com/x");
}

#[test]
fn test_extra_empty_value_is_allowed() {
    let mut extra = ExtraFields::default();
    extra.insert("blank:").unwrap();
    assert_eq!(extra.drain_until(None)[0].value, "");
}

#[test]
fn test_extra_iterates_in_ascending_key_order() {
    let mut extra = ExtraFields::default();
    for spec in ["mango:1", "apple:2", "zebra:3", "banana:4"] {
        extra.insert(spec).unwrap();
    }
    let keys: Vec<&str> = extra.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(keys, ["apple", "banana", "mango", "zebra"]);
}

#[test]
fn test_extra_drain_until_reference() {
    let mut extra = ExtraFields::default();
    extra.insert("author:me").unwrap();
    extra.insert("zz:top").unwrap();

    let drained = extra.drain_until(Some("name"));
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].key, "author");

    let rest = extra.drain_until(None);
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].key, "zz");
    assert!(extra.is_empty());
}

#[test]
fn test_extra_drain_until_is_strict() {
    let mut extra = ExtraFields::default();
    extra.insert("source:SRC").unwrap();
    // a key equal to the reference is not drained
    assert!(extra.drain_until(Some("source")).is_empty());
    assert_eq!(extra.drain_until(None).len(), 1);
}

// ============================================================================
// File manifest
// ============================================================================

#[test]
fn test_manifest_orders_case_insensitively() {
    let mut manifest = FileManifest::new();
    manifest.add("b/x".to_string(), 1);
    manifest.add("A/y".to_string(), 2);
    manifest.add("a/z".to_string(), 3);

    let paths: Vec<&str> = manifest.entries().iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["A/y", "a/z", "b/x"]);
    assert_eq!(manifest.total_size(), 6);
}

#[test]
fn test_manifest_ties_keep_insertion_order() {
    let mut manifest = FileManifest::new();
    manifest.add("README".to_string(), 1);
    manifest.add("readme".to_string(), 2);

    let paths: Vec<&str> = manifest.entries().iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["README", "readme"]);

    let mut manifest = FileManifest::new();
    manifest.add("readme".to_string(), 1);
    manifest.add("README".to_string(), 2);

    let paths: Vec<&str> = manifest.entries().iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["readme", "README"]);
}

#[test]
fn test_manifest_single_file() {
    let manifest = FileManifest::single_file("image.iso", 12345);
    assert_eq!(manifest.len(), 1);
    assert_eq!(manifest.entries()[0].path, "image.iso");
    assert_eq!(manifest.total_size(), 12345);
}

// ============================================================================
// Piece planning
// ============================================================================

#[test]
fn test_piece_plan_bucket_boundaries() {
    // exactly at a ceiling selects that bucket
    let plan = PiecePlan::from_total_size(50 * ONE_MIB, None);
    assert_eq!(plan.piece_length, 1 << 15);
    // one byte over selects the next
    let plan = PiecePlan::from_total_size(50 * ONE_MIB + 1, None);
    assert_eq!(plan.piece_length, 1 << 16);

    let plan = PiecePlan::from_total_size(6400 * ONE_MIB, None);
    assert_eq!(plan.piece_length, 1 << 22);
    // past the whole table falls back to one exponent further
    let plan = PiecePlan::from_total_size(6400 * ONE_MIB + 1, None);
    assert_eq!(plan.piece_length, 1 << 23);
}

#[test]
fn test_piece_plan_zero_size() {
    let plan = PiecePlan::from_total_size(0, None);
    assert_eq!(plan.piece_length, 1 << 15);
    assert_eq!(plan.piece_count, 0);
}

#[test]
fn test_piece_plan_count_is_ceiling_division() {
    let plan = PiecePlan::from_total_size(1, None);
    assert_eq!(plan.piece_count, 1);

    let plan = PiecePlan::from_total_size(1 << 15, None);
    assert_eq!(plan.piece_count, 1);

    let plan = PiecePlan::from_total_size((1 << 15) + 1, None);
    assert_eq!(plan.piece_count, 2);
}

#[test]
fn test_piece_plan_explicit_exponent_skips_table() {
    let plan = PiecePlan::from_total_size(100, Some(28));
    assert_eq!(plan.piece_length, 1 << 28);
    assert_eq!(plan.piece_count, 1);
}

// ============================================================================
// Metainfo writer
// ============================================================================

fn metafile(name: &str, manifest: FileManifest, plan: PiecePlan) -> Metafile {
    Metafile {
        name: name.to_string(),
        announce: Vec::new(),
        comment: None,
        no_creation_date: true,
        private: false,
        web_seeds: Vec::new(),
        extra: ExtraFields::default(),
        target_is_directory: false,
        manifest,
        plan,
    }
}

fn write(metafile: Metafile, digests: &PieceDigests) -> Vec<u8> {
    let mut out = Vec::new();
    metafile.write_to(digests, &mut out).unwrap();
    out
}

fn created_by_field() -> String {
    format!("10:created by{}:{}", CREATED_BY.len(), CREATED_BY)
}

#[test]
fn test_write_empty_single_file() {
    let manifest = FileManifest::single_file("hello.txt", 0);
    let plan = PiecePlan::from_total_size(0, None);
    let out = write(metafile("hello.txt", manifest, plan), &PieceDigests::empty());

    let expected = format!(
        "d{}4:infod6:lengthi0e4:name9:hello.txt12:piece lengthi32768e6:pieces0:ee",
        created_by_field()
    );
    assert_eq!(out, expected.as_bytes());
}

#[test]
fn test_write_directory_document() {
    // the end-to-end layout: two files, one announce URL, no extras
    let mut manifest = FileManifest::new();
    manifest.add("docs/readme.txt".to_string(), 100);
    manifest.add("data.bin".to_string(), 5_000_000);
    let plan = PiecePlan::from_total_size(manifest.total_size(), None);
    assert_eq!(plan.piece_count, 153);

    let digests = PieceDigests::from_digests(vec![[0xAB; 20]; 153]);
    let mut m = metafile("release", manifest, plan);
    m.target_is_directory = true;
    m.announce = vec![vec!["http://tracker.example.com/announce".to_string()]];
    let out = write(m, &digests);

    let mut expected = format!(
        "d8:announce35:http://tracker.example.com/announce{}4:infod\
         5:filesl\
         d6:lengthi5000000e4:pathl8:data.binee\
         d6:lengthi100e4:pathl4:docs10:readme.txtee\
         e\
         4:name7:release12:piece lengthi32768e6:pieces3060:",
        created_by_field()
    )
    .into_bytes();
    expected.extend_from_slice(digests.as_bytes());
    expected.extend_from_slice(b"ee");
    assert_eq!(out, expected);
}

#[test]
fn test_write_interleaves_extra_fields() {
    let manifest = FileManifest::single_file("f.txt", 4);
    let plan = PiecePlan {
        piece_length: 1 << 15,
        piece_count: 1,
    };
    let digests = PieceDigests::from_digests(vec![[0x11; 20]; 1]);

    let mut m = metafile("f.txt", manifest, plan);
    m.private = true;
    for spec in ["zzz:last", "author:me", "version:i87e", "pq:between"] {
        m.extra.insert(spec).unwrap();
    }
    let out = write(m, &digests);

    let mut expected = format!(
        "d{}4:infod\
         6:author2:me\
         6:lengthi4e\
         4:name5:f.txt\
         12:piece lengthi32768e\
         6:pieces20:",
        created_by_field()
    )
    .into_bytes();
    expected.extend_from_slice(&[0x11; 20]);
    // pq sorts between pieces and private; version is a legal integer
    // literal and is emitted raw
    expected.extend_from_slice(b"2:pq7:between7:privatei1e7:versioni87e3:zzz4:lastee");
    assert_eq!(out, expected);
}

#[test]
fn test_write_announce_list_rules() {
    let manifest = FileManifest::single_file("f", 0);
    let plan = PiecePlan::from_total_size(0, None);

    // a single URL gets no announce-list
    let mut m = metafile("f", FileManifest::single_file("f", 0), plan);
    m.announce = vec![vec!["http://a/".to_string()]];
    let out = write(m, &PieceDigests::empty());
    assert!(!contains(&out, b"announce-list"));

    // two URLs in one tier
    let mut m = metafile("f", FileManifest::single_file("f", 0), plan);
    m.announce = vec![vec!["http://a/".to_string(), "http://b/".to_string()]];
    let out = write(m, &PieceDigests::empty());
    assert!(contains(
        &out,
        b"13:announce-listll9:http://a/9:http://b/ee"
    ));

    // two tiers, one URL each
    let mut m = metafile("f", manifest, plan);
    m.announce = vec![
        vec!["http://a/".to_string()],
        vec!["http://b/".to_string()],
    ];
    let out = write(m, &PieceDigests::empty());
    assert!(out.starts_with(b"d8:announce9:http://a/13:announce-listll9:http://a/el9:http://b/ee"));
}

#[test]
fn test_write_comment() {
    let plan = PiecePlan::from_total_size(0, None);
    let mut m = metafile("f", FileManifest::single_file("f", 0), plan);
    m.comment = Some("hello there".to_string());
    let out = write(m, &PieceDigests::empty());
    assert!(out.starts_with(b"d7:comment11:hello there10:created by"));
}

#[test]
fn test_write_creation_date_unless_suppressed() {
    let plan = PiecePlan::from_total_size(0, None);
    let mut m = metafile("f", FileManifest::single_file("f", 0), plan);
    m.no_creation_date = false;
    let out = write(m, &PieceDigests::empty());
    assert!(contains(&out, b"13:creation datei"));

    let m = metafile("f", FileManifest::single_file("f", 0), plan);
    let out = write(m, &PieceDigests::empty());
    assert!(!contains(&out, b"creation date"));
}

#[test]
fn test_write_web_seeds() {
    let plan = PiecePlan::from_total_size(0, None);

    // exactly one URL is a plain byte string
    let mut m = metafile("f", FileManifest::single_file("f", 0), plan);
    m.web_seeds = vec!["http://seed/x".to_string()];
    let out = write(m, &PieceDigests::empty());
    assert!(out.ends_with(b"8:url-list13:http://seed/xe"));

    // several URLs become a list, in the order given
    let mut m = metafile("f", FileManifest::single_file("f", 0), plan);
    m.web_seeds = vec!["http://b/".to_string(), "http://a/".to_string()];
    let out = write(m, &PieceDigests::empty());
    assert!(out.ends_with(b"8:url-listl9:http://b/9:http://a/ee"));
}

#[test]
fn test_validate_private_requires_announce() {
    let plan = PiecePlan::from_total_size(0, None);
    let mut m = metafile("f", FileManifest::single_file("f", 0), plan);
    m.private = true;
    assert!(matches!(
        m.validate(),
        Err(MetainfoError::PrivateWithoutAnnounce)
    ));

    m.announce = vec![vec!["http://a/".to_string()]];
    assert!(m.validate().is_ok());
}

#[test]
fn test_validate_rejects_empty_name() {
    let plan = PiecePlan::from_total_size(0, None);
    let m = metafile("", FileManifest::single_file("f", 0), plan);
    assert!(matches!(m.validate(), Err(MetainfoError::MissingName)));
}

#[test]
fn test_write_rejects_mismatched_digest_table() {
    let manifest = FileManifest::single_file("f", 100);
    let plan = PiecePlan {
        piece_length: 1 << 15,
        piece_count: 1,
    };
    let m = metafile("f", manifest, plan);
    let result = m.write_to(&PieceDigests::empty(), &mut Vec::new());
    assert!(matches!(result, Err(MetainfoError::Internal(_))));
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
