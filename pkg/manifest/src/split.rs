use crate::ManifestError;

/// Size ceiling for a single document. A rendered chart may be large,
/// but one document this big means something is wrong upstream.
pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

/// A document separator is a line holding exactly three hyphens.
const SEPARATOR: &[u8] = b"\n---\n";

/// Split a manifest byte stream into its documents.
///
/// The returned iterator is lazy, forward-only, and borrows the input:
/// each item is the byte range of one document, in stream order. The
/// final chunk is emitted even without a trailing separator. A document
/// larger than [`MAX_DOCUMENT_BYTES`] yields an error and ends the
/// sequence.
pub fn split_documents(data: &[u8]) -> DocSplitter<'_> {
    DocSplitter {
        data,
        pos: 0,
        done: false,
    }
}

pub struct DocSplitter<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Iterator for DocSplitter<'a> {
    type Item = Result<&'a [u8], ManifestError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos >= self.data.len() {
            self.done = true;
            return None;
        }
        let rest = &self.data[self.pos..];
        match find_separator(rest) {
            Some(at) => {
                if at > MAX_DOCUMENT_BYTES {
                    self.done = true;
                    return Some(Err(ManifestError::DocumentTooLarge(at)));
                }
                self.pos += at + SEPARATOR.len();
                Some(Ok(&rest[..at]))
            }
            None => {
                self.done = true;
                if rest.len() > MAX_DOCUMENT_BYTES {
                    return Some(Err(ManifestError::DocumentTooLarge(rest.len())));
                }
                Some(Ok(rest))
            }
        }
    }
}

fn find_separator(data: &[u8]) -> Option<usize> {
    data.windows(SEPARATOR.len()).position(|w| w == SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(input: &str) -> Vec<String> {
        split_documents(input.as_bytes())
            .map(|d| String::from_utf8(d.unwrap().to_vec()).unwrap())
            .collect()
    }

    #[test]
    fn splits_on_separator_lines() {
        assert_eq!(docs("a: 1\n---\nb: 2\n---\nc: 3"), ["a: 1", "b: 2", "c: 3"]);
    }

    #[test]
    fn final_chunk_without_trailing_separator() {
        assert_eq!(docs("a: 1\n---\nb: 2"), ["a: 1", "b: 2"]);
    }

    #[test]
    fn trailing_separator_emits_no_empty_document() {
        assert_eq!(docs("a: 1\n---\n"), ["a: 1"]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(split_documents(b"").next().is_none());
    }

    #[test]
    fn hyphens_inside_a_line_are_not_separators() {
        assert_eq!(docs("a: --- not a separator\nb: 2"), ["a: --- not a separator\nb: 2"]);
    }

    #[test]
    fn oversized_document_fails() {
        let mut big = vec![b'x'; MAX_DOCUMENT_BYTES + 1];
        big.extend_from_slice(b"\n---\nok: 1");
        let mut iter = split_documents(&big);
        assert_eq!(
            iter.next(),
            Some(Err(ManifestError::DocumentTooLarge(MAX_DOCUMENT_BYTES + 1)))
        );
        // the error ends the sequence
        assert!(iter.next().is_none());
    }
}
