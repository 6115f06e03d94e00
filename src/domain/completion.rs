/// One unit of a streamed completion. Chunks of a single request are concatenated in
/// arrival order until the final one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionChunk {
    pub text: String,
    pub is_final: bool,
}

impl CompletionChunk {
    pub fn new(text: impl Into<String>, is_final: bool) -> Self {
        Self {
            text: text.into(),
            is_final,
        }
    }
}
