// Idea extraction prompt templates.

pub const EXTRACTION_SYSTEM: &str = "\
You are a content strategist who mines source material for publishable ideas. \
You MUST respond with valid JSON only, with no markdown fences and no explanations. \
Only propose ideas that are grounded in the text you are given.";

pub const EXTRACTION_PROMPT: &str = r#"Read the following {document_type} and propose content ideas the author could publish.

TITLE:
{title}

TEXT:
{content}

Return a JSON array (at most {max_ideas} items) with exactly this structure:
[
  {
    "title": "short working title for the post",
    "description": "one or two sentences on the angle and why it matters",
    "excerpt": "verbatim quote from the text that supports the idea"
  }
]

Return an empty array if the text contains nothing worth publishing."#;
