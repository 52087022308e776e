//! Capture ordering: modification time first, then natural file-name order.

use super::ImageFile;
use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Sort images oldest first, breaking ties with [`natural_cmp`] on the file name.
pub fn sort_chronologically(images: &mut [ImageFile]) {
    images.sort_by(|a, b| {
        a.modified
            .cmp(&b.modified)
            .then_with(|| natural_cmp(&a.filename, &b.filename))
    });
}

/// Compare two strings treating digit runs as numbers.
///
/// `shot2.png` sorts before `shot10.png`. Letters compare case-insensitively;
/// strings that only differ in case or zero padding still get a total order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => break,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                let ordering = compare_numeric(&l_run, &r_run);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                left.next();
                right.next();
                let ordering = l.to_lowercase().cmp(r.to_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }

    a.cmp(b)
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

/// Numeric comparison of two ASCII digit runs of any length.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');

    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
        .then_with(|| a.len().cmp(&b.len()))
}
