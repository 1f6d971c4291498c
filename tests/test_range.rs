use rangeserve::http::range::{ByteRange, RangeError, parse_range, read_range};
use std::io::Cursor;

#[test]
fn test_explicit_range() {
    let r = parse_range("bytes=10-19", 100).unwrap();
    assert_eq!(
        r,
        ByteRange {
            start: 10,
            end: 19,
            total: 100,
        }
    );
    assert_eq!(r.len(), 10);
    assert_eq!(r.content_range(), "bytes 10-19/100");
}

#[test]
fn test_every_valid_explicit_range_is_exact() {
    let total = 12;
    for start in 0..total {
        for end in start..total {
            let r = parse_range(&format!("bytes={start}-{end}"), total).unwrap();
            assert_eq!((r.start, r.end), (start, end));
        }
    }
}

#[test]
fn test_suffix_range() {
    let r = parse_range("bytes=-10", 100).unwrap();
    assert_eq!((r.start, r.end), (90, 99));
}

#[test]
fn test_suffix_larger_than_resource_spans_everything() {
    for n in [100, 101, 1000, u64::MAX] {
        let r = parse_range(&format!("bytes=-{n}"), 100).unwrap();
        assert_eq!((r.start, r.end, r.total), (0, 99, 100));
    }
}

#[test]
fn test_zero_suffix_is_unsatisfiable() {
    assert!(matches!(
        parse_range("bytes=-0", 100),
        Err(RangeError::Unsatisfiable { .. })
    ));
}

#[test]
fn test_start_only_range_runs_to_end() {
    for start in 0..100 {
        let r = parse_range(&format!("bytes={start}-"), 100).unwrap();
        assert_eq!((r.start, r.end), (start, 99));
    }
}

#[test]
fn test_start_only_past_end() {
    assert!(matches!(
        parse_range("bytes=100-", 100),
        Err(RangeError::Unsatisfiable { .. })
    ));
}

#[test]
fn test_start_after_end() {
    assert_eq!(
        parse_range("bytes=20-10", 100),
        Err(RangeError::Unsatisfiable {
            start: 20,
            end: 10,
            total: 100,
        })
    );
}

#[test]
fn test_end_beyond_resource() {
    assert_eq!(
        parse_range("bytes=0-100", 100),
        Err(RangeError::Unsatisfiable {
            start: 0,
            end: 100,
            total: 100,
        })
    );
}

#[test]
fn test_empty_resource_never_satisfiable() {
    for header in ["bytes=0-0", "bytes=0-", "bytes=-1", "bytes=-0"] {
        assert!(
            matches!(parse_range(header, 0), Err(RangeError::Unsatisfiable { .. })),
            "{header}"
        );
    }
}

#[test]
fn test_missing_prefix() {
    assert_eq!(parse_range("items=0-1", 100), Err(RangeError::MissingPrefix));
    assert_eq!(parse_range("Bytes=0-1", 100), Err(RangeError::MissingPrefix));
    assert_eq!(parse_range("", 100), Err(RangeError::MissingPrefix));
}

#[test]
fn test_multi_range_rejected() {
    assert!(matches!(
        parse_range("bytes=1-2,5-6", 100),
        Err(RangeError::MalformedSpec(_))
    ));
    assert!(parse_range("bytes=1-2,5", 100).is_err());
}

#[test]
fn test_no_separator() {
    assert!(matches!(
        parse_range("bytes=5", 100),
        Err(RangeError::MalformedSpec(_))
    ));
}

#[test]
fn test_non_numeric_bounds() {
    assert!(matches!(
        parse_range("bytes=a-5", 100),
        Err(RangeError::InvalidNumber(_))
    ));
    assert!(matches!(
        parse_range("bytes=0-b", 100),
        Err(RangeError::InvalidNumber(_))
    ));
    assert!(matches!(
        parse_range("bytes=-", 100),
        Err(RangeError::InvalidNumber(_))
    ));
}

#[tokio::test]
async fn test_read_range_slices_source() {
    let data: Vec<u8> = (0..100u8).collect();
    let mut source = Cursor::new(data.clone());

    let range = parse_range("bytes=10-19", 100).unwrap();
    let body = read_range(&mut source, &range).await.unwrap();

    assert_eq!(body, &data[10..20]);
}

#[tokio::test]
async fn test_read_range_short_read_fails() {
    // Declared length is larger than what the source actually holds
    let mut source = Cursor::new(vec![0u8; 50]);
    let range = parse_range("bytes=40-59", 100).unwrap();

    let err = read_range(&mut source, &range).await.unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
}

#[tokio::test]
async fn test_adjacent_ranges_reassemble_resource() {
    let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
    let total = data.len() as u64;

    for chunk in [1u64, 7, 128, 999, 1000] {
        let mut rebuilt = Vec::new();
        let mut start = 0;
        while start < total {
            let end = (start + chunk - 1).min(total - 1);
            let range = parse_range(&format!("bytes={start}-{end}"), total).unwrap();
            let mut source = Cursor::new(data.clone());
            rebuilt.extend(read_range(&mut source, &range).await.unwrap());
            start = end + 1;
        }
        assert_eq!(rebuilt, data, "chunk={chunk}");
    }
}
