//! POSIX shell quoting for the guest relay boundary.
//!
//! Host commands are spawned from argument vectors and never pass through a
//! shell. The relay, however, hands a single command string to a shell
//! inside the guest; this is the only place such a string is built.

/// Characters that never need quoting.
fn is_plain(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'_' | b'-' | b'.' | b'/' | b'=' | b':' | b',' | b'+' | b'@' | b'%'
        )
}

/// Quote one word for a POSIX shell.
///
/// Plain words are returned as-is. Anything else is wrapped in single
/// quotes; an embedded `'` closes the quote, emits an escaped quote and
/// reopens it (`'\''`). Nothing inside single quotes is expanded, so
/// `"`, `` ` ``, `$` and `\` are all literal.
pub fn shell_quote(word: &str) -> String {
    if !word.is_empty() && word.bytes().all(is_plain) {
        return word.to_string();
    }
    let mut quoted = String::with_capacity(word.len() + 2);
    quoted.push('\'');
    for c in word.chars() {
        if c == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    quoted
}

/// Join an argument vector into one shell command line.
pub fn join<S: AsRef<str>>(argv: &[S]) -> String {
    argv.iter()
        .map(|a| shell_quote(a.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
