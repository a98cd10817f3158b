// Fixed prompt text for draft generation.
// Section order and placeholders are assembled in prompt_builder.rs.

pub const NOT_SPECIFIED: &str = "Not specified";
pub const NO_PILLARS: &str = "No content pillars available";
pub const NO_AUDIENCES: &str = "No target audiences available";
pub const NO_STYLE_PROFILE: &str = "No writing style profile available";
pub const NO_PREVIOUS_POSTS: &str = "No previous posts available";

pub const POST_BEGIN: &str = "---BEGIN POST---";
pub const POST_END: &str = "---END POST---";

pub const LINKEDIN_BEST_PRACTICES: &str = "\
## LinkedIn Best Practices
- Open with a hook in the first line that makes the reader click \"see more\"
- Keep paragraphs to one or two short sentences with white space between them
- Tell a specific story or share a concrete lesson, not a generic opinion
- Write in the first person, in the author's own voice
- Keep the post between 150 and 300 words
- Close with a question or clear call to action that invites comments
- Avoid external links in the body of the post";

pub const NEWSLETTER_BEST_PRACTICES: &str = "\
## Newsletter Best Practices
- Start with a subject line suggestion on the first line, prefixed with \"Subject:\"
- Lead with why this matters to the reader right now
- Use clear section headings and keep each section skimmable
- Give the reader at least one practical takeaway they can act on this week
- Keep a warm, personal tone as if writing to one subscriber
- End with a single, specific call to action";

pub const MARKETING_BEST_PRACTICES: &str = "\
## Marketing Copy Best Practices
- Lead with the outcome the customer wants, not the feature
- Address the audience's pain points directly and specifically
- Support every claim with a concrete detail from the context
- Use short, scannable sentences and active verbs
- Include one clear, low-friction call to action
- Avoid superlatives and hype the business cannot back up";

pub const LINKEDIN_TASK: &str = "\
## Task
Write a LinkedIn post based on the content idea above, following the writing style and best practices.
Return ONLY the post body. Do not include any commentary, preamble, explanation, or quotation marks around the post.
End the post with 3 to 5 relevant hashtags on their own line.";

pub const NEWSLETTER_TASK: &str = "\
## Task
Write a newsletter article based on the content idea above, following the writing style and best practices.
Return only the newsletter content, starting with the subject line. Do not add commentary about the article.";

pub const MARKETING_TASK: &str = "\
## Task
Write marketing copy based on the content idea above, following the writing style and best practices.
Return only the copy itself. Do not add commentary, alternatives, or explanations.";

pub const PREVIEW_TASK: &str = "\
## Task
Write a short sample piece in this author's voice about their business, so they can check the style guide \
captures how they write. Return only the sample content with no commentary.";
