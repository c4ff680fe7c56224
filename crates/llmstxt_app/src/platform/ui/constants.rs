pub const TITLE: &str = "llms.txt Generator";
pub const PROGRESS_MARKER: &str = ">>>";
pub const RULE: &str = "────────────────────────────────────────";

pub const HELP: &[&str] = &[
    "  <url>                    generate llms.txt for a site",
    "  pages <1-75>             max pages to crawl",
    "  depth <1-5>              max crawl depth",
    "  format <standard|full>   output format",
    "  exclude <paths...>       path prefixes to skip (empty to clear)",
    "  save | copy              save or print the finished document",
    "  reset                    generate another / try again",
    "  quit",
];
