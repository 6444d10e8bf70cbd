#![allow(missing_docs)]

use std::io::{self, Read};

use bytes::Bytes;
use mimesplit::{Delimiter, DelimiterScanner};

#[test]
fn reads_up_to_delimiter_and_hands_back_the_tail() {
    let mut scanner = DelimiterScanner::new(&b"header\r\n\r\nbody bytes"[..], delimiter(b"\r\n\r\n"));

    assert_eq!(read_all(&mut scanner), b"header");
    assert!(scanner.delimiter_found());
    assert!(scanner.is_finished());

    let mut rest = scanner.into_remaining().expect("remaining source");
    assert_eq!(read_all(&mut rest), b"body bytes");
}

#[test]
fn detects_delimiter_straddling_refills_for_many_lengths() {
    for len in [1usize, 2, 3, 4, 7, 16, 70, 255, 300] {
        let needle: Vec<u8> = (0..len).map(|i| b"-=_B"[i % 4]).collect();
        let prefixes = [
            0,
            1,
            len - 1,
            len,
            len + 1,
            2 * len - 1,
            2 * len,
            2 * len + 1,
            3 * len,
            5 * len + 3,
        ];

        for prefix in prefixes {
            let mut input = vec![b'x'; prefix];
            input.extend_from_slice(&needle);
            input.extend_from_slice(b"tail");

            for chunk in [1usize, 7, usize::MAX] {
                let source = ChunkedReader::new(input.clone(), chunk);
                let mut scanner = DelimiterScanner::new(source, delimiter(&needle));

                let head = read_all(&mut scanner);
                assert_eq!(head.len(), prefix, "len {len}, prefix {prefix}, chunk {chunk}");
                assert!(head.iter().all(|&byte| byte == b'x'));
                assert!(scanner.delimiter_found());

                let mut rest = scanner.into_remaining().expect("remaining source");
                assert_eq!(
                    read_all(&mut rest),
                    b"tail",
                    "len {len}, prefix {prefix}, chunk {chunk}"
                );
            }
        }
    }
}

#[test]
fn finds_self_overlapping_delimiter() {
    let source = ChunkedReader::new(b"aaaabaab!".to_vec(), 1);
    let mut scanner = DelimiterScanner::new(source, delimiter(b"aab"));

    assert_eq!(read_all(&mut scanner), b"aa");
    let mut rest = scanner.into_remaining().expect("remaining source");
    assert_eq!(read_all(&mut rest), b"aab!");
}

#[test]
fn passes_everything_through_when_delimiter_is_absent() {
    let input: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
    let source = ChunkedReader::new(input.clone(), 13);
    let mut scanner = DelimiterScanner::new(source, delimiter(b"\r\n--never--"));

    assert_eq!(read_all(&mut scanner), input);
    assert!(!scanner.delimiter_found());
    assert!(scanner.is_finished());

    let mut rest = scanner.into_remaining().expect("remaining source");
    assert!(read_all(&mut rest).is_empty());
}

#[test]
fn terminal_state_keeps_returning_end_of_data() {
    let mut scanner = DelimiterScanner::new(&b"ab|cd"[..], delimiter(b"|"));
    assert_eq!(read_all(&mut scanner), b"ab");

    let mut buf = [0u8; 8];
    for _ in 0..3 {
        assert_eq!(scanner.read(&mut buf).expect("read after end"), 0);
        assert_eq!(scanner.read_byte().expect("read byte after end"), None);
    }
}

#[test]
fn single_byte_reads_match_bulk_reads() {
    let input = b"one--two--three".to_vec();
    let mut scanner = DelimiterScanner::new(ChunkedReader::new(input, 2), delimiter(b"--"));

    let mut collected = Vec::new();
    while let Some(byte) = scanner.read_byte().expect("byte read") {
        collected.push(byte);
    }
    assert_eq!(collected, b"one");
}

#[test]
fn delimiter_at_start_yields_empty_segment() {
    let mut scanner = DelimiterScanner::new(&b"--rest"[..], delimiter(b"--"));
    assert!(read_all(&mut scanner).is_empty());
    assert!(scanner.delimiter_found());

    let mut rest = scanner.into_remaining().expect("remaining source");
    assert_eq!(read_all(&mut rest), b"rest");
}

#[test]
fn remaining_source_skips_unread_segment_bytes() {
    let scanner = DelimiterScanner::new(&b"skipped entirely;next"[..], delimiter(b";"));
    let mut rest = scanner.into_remaining().expect("remaining source");
    assert_eq!(read_all(&mut rest), b"next");
}

#[test]
fn chained_scanners_see_each_segment_once() {
    let input = b"a,b,,c".to_vec();
    let mut source = DelimiterScanner::new(ChunkedReader::new(input, 1), delimiter(b","))
        .into_remaining()
        .expect("first tail");
    let mut segments = vec![b"a".to_vec()];

    loop {
        let mut scanner = DelimiterScanner::with_source(source, delimiter(b","));
        segments.push(read_all(&mut scanner));
        let found = scanner.delimiter_found();
        source = scanner.into_remaining().expect("tail");
        if !found {
            break;
        }
    }

    assert_eq!(segments, vec![b"a".to_vec(), b"b".to_vec(), Vec::new(), b"c".to_vec()]);
}

#[test]
fn nested_scanner_reads_through_outer_bound() {
    let outer = DelimiterScanner::new(&b"x;y;z|after"[..], delimiter(b"|"));
    let mut inner = DelimiterScanner::new(outer, delimiter(b";"));
    assert_eq!(read_all(&mut inner), b"x");

    let mut rest = inner.into_remaining().expect("inner tail");
    assert_eq!(read_all(&mut rest), b"y;z");
    assert!(rest.get_ref().delimiter_found());

    let mut after = rest.into_inner().into_remaining().expect("outer tail");
    assert_eq!(read_all(&mut after), b"after");
}

#[test]
fn propagates_source_errors_unchanged() {
    let source = FailingReader {
        data: b"0123456789".to_vec(),
        pos: 0,
    };
    let mut scanner = DelimiterScanner::new(source, delimiter(b"--"));

    let mut out = Vec::new();
    let err = scanner.read_to_end(&mut out).expect_err("source failure must surface");
    assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
}

fn delimiter(bytes: &[u8]) -> Delimiter {
    Delimiter::new(Bytes::copy_from_slice(bytes)).expect("non-empty delimiter")
}

fn read_all(reader: &mut impl Read) -> Vec<u8> {
    let mut out = Vec::new();
    reader.read_to_end(&mut out).expect("read should succeed");
    out
}

#[derive(Debug)]
struct ChunkedReader {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
}

impl ChunkedReader {
    fn new(data: Vec<u8>, chunk: usize) -> Self {
        Self { data, pos: 0, chunk }
    }
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.chunk).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

#[derive(Debug)]
struct FailingReader {
    data: Vec<u8>,
    pos: usize,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos == self.data.len() {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away"));
        }
        let n = buf.len().min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
