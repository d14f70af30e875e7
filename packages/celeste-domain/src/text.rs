use unicode_segmentation::UnicodeSegmentation;

const ELLIPSIS: &str = "...";

pub fn normalize_whitespace(raw: &str) -> String {
	raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn truncate_graphemes(raw: &str, max_graphemes: usize) -> String {
	let mut graphemes = raw.graphemes(true);
	let head: String = graphemes.by_ref().take(max_graphemes).collect();

	if graphemes.next().is_none() {
		return head;
	}

	let mut out = head.trim_end().to_string();

	out.push_str(ELLIPSIS);

	out
}

/// Last segment of a slash or backslash separated path.
pub fn path_tail(raw: &str) -> Option<&str> {
	raw.rsplit(['/', '\\']).map(str::trim).find(|segment| !segment.is_empty())
}
