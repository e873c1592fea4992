//! Builds the user prompt sent to the text generator.
//!
//! Comment texts are passed through as newline-separated lines. When the
//! comments are too terse to summarize on their own, curator metadata is
//! appended as a context note.

use collection_datastore::CollectionContext;
use itertools::Itertools;

/// Mean trimmed length (in characters) below which comments count as terse
pub const MIN_MEAN_COMMENT_CHARS: usize = 15;
/// A comment with at most this many words is a one-liner
pub const ONE_LINER_MAX_WORDS: usize = 2;
/// Share of one-liners, in percent, at which the whole set is terse
pub const ONE_LINER_SHARE_PERCENT: usize = 70;
pub const EXPLANATION_MAX_CHARS: usize = 200;
pub const ELLIPSIS: &str = "...";

const STYLE_REMINDER: &str = "Tetap ikuti gaya yang sama: prosa naratif (bukan poin-poin), \
paling banyak 150 kata, nada hangat dan inklusif, tanpa kutipan langsung, emoji, URL, \
atau nama pengguna.";

/// Returns true when `comments` carry too little signal to summarize alone.
///
/// That is the case when the mean trimmed length is under
/// [`MIN_MEAN_COMMENT_CHARS`] or when at least [`ONE_LINER_SHARE_PERCENT`]
/// percent of comments have [`ONE_LINER_MAX_WORDS`] words or fewer. An empty
/// slice is weak.
pub fn is_weak_signal<S: AsRef<str>>(comments: &[S]) -> bool {
    if comments.is_empty() {
        return true;
    }

    let count = comments.len();
    let total_chars: usize = comments
        .iter()
        .map(|c| c.as_ref().trim().chars().count())
        .sum();
    let one_liners = comments
        .iter()
        .filter(|c| c.as_ref().split_whitespace().count() <= ONE_LINER_MAX_WORDS)
        .count();

    // integer forms of `mean < 15` and `share >= 70%`
    total_chars < MIN_MEAN_COMMENT_CHARS * count
        || one_liners * 100 >= ONE_LINER_SHARE_PERCENT * count
}

/// Context note describing the collection, or `None` when the context has
/// neither a name nor an explanation.
pub fn context_note(context: &CollectionContext) -> Option<String> {
    if context.is_empty() {
        return None;
    }

    let mut note =
        String::from("Catatan konteks koleksi (komentar pengunjung masih sangat singkat):\n");

    if let Some(explanation) = context.explanation() {
        note.push_str("- Penjelasan kurator/seniman: ");
        note.push_str(&truncate_chars(explanation, EXPLANATION_MAX_CHARS));
        note.push('\n');
    }
    if let Some(name) = context.name() {
        note.push_str("- Nama koleksi: ");
        note.push_str(name);
        note.push('\n');
    }

    note.push_str(
        "Gunakan konteks ini secukupnya untuk memperjelas makna, dan tetap jadikan \
         tanggapan pengunjung sebagai fokus utama ringkasan.",
    );

    Some(note)
}

/// Assembles the prompt for a full regeneration, or for an incremental one
/// when `previous_summary` is given.
pub fn build_prompt<S: AsRef<str>>(
    comments: &[S],
    previous_summary: Option<&str>,
    context: Option<&CollectionContext>,
) -> String {
    let joined = comments.iter().map(|c| c.as_ref().trim()).join("\n");

    let note = context
        .filter(|_| is_weak_signal(comments))
        .and_then(context_note);

    let mut sections = Vec::with_capacity(4);
    match previous_summary {
        None => sections.push(joined),
        Some(previous) => {
            sections.push(format!("Ringkasan sebelumnya:\n{}", previous.trim()));
            sections.push(format!("Komentar baru:\n{joined}"));
        }
    }

    sections.extend(note);

    if previous_summary.is_some() {
        sections.push(format!(
            "Perbarui ringkasan sebelumnya dengan memadukan informasi lama dan komentar baru \
             menjadi satu narasi yang utuh. {STYLE_REMINDER}"
        ));
    }

    sections.join("\n\n")
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}
