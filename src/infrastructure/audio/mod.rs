mod openai_whisper_engine;

pub use openai_whisper_engine::{DEFAULT_LANGUAGE, DEFAULT_MODEL, OpenAiWhisperEngine};
