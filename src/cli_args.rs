use clap::Parser;

/// CLI options. The tool takes no arguments; configuration comes from the
/// environment and `~/.config/conventional-commits-ai.toml`.
#[derive(Parser, Debug)]
#[command(
    name = "conventional-commits-ai",
    version,
    about = "Generate conventional commit messages with AI",
    long_about = "Generate a conventional commit message for the uncommitted changes in the \
                  current git repository.\n\n\
                  Environment:\n  \
                  OPENAI_API_KEY     API key (required)\n  \
                  OPENAI_BASE_URL    OpenAI-compatible endpoint (default https://api.openai.com)\n  \
                  CCAI_MODEL         Model name (default gpt-4.1)\n  \
                  CCAI_TIMEOUT_SECS  Request timeout in seconds (default 90)\n  \
                  CCAI_LOG_DEPTH     Number of recent commits sent as style reference (default 30)\n  \
                  CCAI_VERBOSITY     Log verbosity on stderr, 0-3 (default 0)"
)]
pub struct Cli {}
