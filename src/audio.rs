/// Speech output for a single word. Fire-and-forget: nothing is returned.
pub trait Pronouncer: Send + Sync {
    fn pronounce(&self, text: &str);
}

/// Playback happens on the client; the server only records the request.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPronouncer;

impl Pronouncer for TracingPronouncer {
    fn pronounce(&self, text: &str) {
        tracing::debug!(text, lang = "en-US", "Pronunciation requested");
    }
}
