//! 报告提示词模板
//!
//! 模板中的 `{name}` 占位符在渲染时被替换，未识别的占位符原样保留。

use crate::research::context::ResearchContext;
use crate::types::report::{ReportMode, ReportRequest};

pub const SALES_SYSTEM_PROMPT: &str =
    "You are a helpful and insightful B2B strategic assistant.";

pub const INTERVIEW_SYSTEM_PROMPT: &str =
    "You are an expert career coach and strategic advisor helping candidates prepare for interviews.";

pub const SALES_OUTREACH_TEMPLATE: &str = r#"
You are a B2B Strategy Expert creating a Strategic Account Brief for a sales professional.

COMPANY: {company_name}

WEBSITE CONTENT (truncated):
{website_content}

RECENT NEWS (Last 6 Months):
{news_text}

USER'S SOLUTION:
"{val_prop_context}"

Generate a brief following this EXACT structure:

At the very top, include this metadata line in plain text:
📊 Research Sources: DuckDuckGo + Google News | Website: {scraped_status} | Articles Analyzed: {article_count}

# Strategic Account Brief: {company_name}

## 1. Company Profile
Provide a concise 2-3 sentence overview of what the company does, their primary industry, and key offerings based on the website content provided.

## 2. Recent Developments
List recent news with specific dates in [Month Year] format. Each item should be a bullet point starting with the date in square brackets, followed by the development. If no news found, state: "No recent news articles were found in our search."

## 3. Buying Signals & Strategic Shifts
Identify 3-5 specific indicators from the news and company info that suggest they might need B2B solutions. Focus on: expansion, technology changes, regulatory challenges, growth signals, operational efficiency drives. Write as a cohesive paragraph, NOT bullet points.

## 4. Strategic Messaging Hooks

CRITICAL FORMAT - You MUST follow this structure EXACTLY for each hook:

1. [Hook Title]: "[Quoted messaging text the user can use verbatim with this prospect]"

Relevance: [2-3 sentences explaining why this hook is specifically relevant to this company's situation based on the news/context you found]

2. [Hook Title]: "[Quoted messaging text]"

Relevance: [Explanation tied to specific company context]

3. [Hook Title]: "[Quoted messaging text]"

Relevance: [Explanation tied to specific company context]

CRITICAL FORMATTING RULES:
- Do NOT use markdown code blocks anywhere in your output
- Use ## for main section headings only
- Do NOT use bold (**) within paragraph text except for emphasis in hook titles
- Keep all currency and number formatting as plain text
- Each messaging hook MUST include both the quoted text AND the Relevance explanation
- Relevance explanations must reference specific details from the company's news or situation
- Never start a sentence with "Your" - use second person naturally within sentences only

Output in clean, professional Markdown. Be specific and actionable throughout.
"#;

pub const INTERVIEW_PREP_TEMPLATE: &str = r#"
You are a Strategic Career Advisor helping a candidate prepare for an interview. Your analysis must be evidence-based, specific, and grounded in verifiable company data.

COMPANY: {company_name}

WEBSITE CONTENT (truncated):
{website_content}

RECENT NEWS (Last 6 Months):
{news_text}

JOB DESCRIPTION (JD):
{job_description}

CANDIDATE CV (Extracted Text):
{cv_text}

CRITICAL: You MUST generate ALL 6 sections below. Do NOT skip any section. Do NOT merge sections.

Generate an Interview Strategy Guide following this EXACT structure:

At the very top, include this metadata line in plain text:
📊 Research Sources: DuckDuckGo + Google News | Website: {scraped_status} | Articles Analyzed: {article_count}

# Interview Strategy Guide: {company_name}

## 1. Company Overview
Provide a concise 2-3 sentence overview of what the company does, their primary industry, and key offerings.

## 2. Recent Developments
This section MUST be a BULLETED LIST. Each bullet starts with a date in [Month Year] format, describes the development, and ends with a link to the source article in the format ([Source](URL)). Focus on hard news: financial results, M&A activity, executive hires, product launches, strategic pivots. If no news articles were found in the search, state: "No recent news articles were found in our search."

## 3. Role Hypothesis
Explain why they are hiring for this specific role NOW. Connect the Job Description requirements to the company's recent developments from Section 2.

## 4. Candidate Fit & Alignment

### Your Strongest Assets for This Role
Identify the 3 best achievements from the candidate's CV that are most relevant to this role. Quote specific details from the CV (revenue numbers, team sizes, percentages, timeframes). For each asset:
1. **[Asset Title]**: [Achievement from CV with metrics]
   - **Why it matters**: [How this addresses a JD requirement or company challenge]

### Strategic Proof Points
Create 2-3 mappings in this format:
**Company Challenge**: [Specific challenge from Recent Developments or JD]
**Your Proof Point**: [Specific metric or achievement from CV]

If you cannot find specific metrics in the CV that map to company challenges, include this exact warning:
"⚠️ **Strengthen Your Application**: Based on the CV provided, we were unable to identify specific quantified achievements that directly map to the strategic challenges outlined above. Consider adding metrics (revenue impact, team size, % growth, cost savings, etc.) to strengthen your interview talking points."

## 5. Strategic Priorities to Explore
MANDATORY: This section MUST appear in your output. Identify 3-4 TACTICAL areas (team structure, processes, tools, immediate challenges) to explore during the interview:
**[Priority Area]**: [Why this matters - reference specific news or JD requirement]
→ *Interview Angle*: "[Specific operational question to ask]"

## 6. Killer Strategic Questions
Generate 3 BIG PICTURE questions about company direction, vision and long-term goals. For each:
**Context**: [1-2 sentences referencing specific company news or JD details]
**Question**: [The question itself]

CRITICAL FORMATTING RULES:
- ABSOLUTELY NO BACKTICKS anywhere in your output - not for code blocks, not for inline code, not for any reason
- Use ## for main section headings only
- Section 2 MUST be a bulleted list with dates and hyperlinks - NOT a narrative paragraph
- Section 5 MUST appear - do not skip it
- Quote specific CV metrics in Section 4 - do not use generic phrases like "extensive experience"
- Keep all currency and number formatting as plain text
- Be specific and evidence-based throughout - avoid generic career advice

Output in clean, professional Markdown.
"#;

/// 按报告模式选择系统指令与模板
pub fn templates_for(mode: ReportMode) -> (&'static str, &'static str) {
    match mode {
        ReportMode::SalesOutreach => (SALES_SYSTEM_PROMPT, SALES_OUTREACH_TEMPLATE),
        ReportMode::InterviewPrep => (INTERVIEW_SYSTEM_PROMPT, INTERVIEW_PREP_TEMPLATE),
    }
}

/// 用调研上下文和请求中的模式专属字段渲染模板
pub fn render(template: &str, request: &ReportRequest, context: &ResearchContext) -> String {
    let counts = context.source_counts;
    let mut values: Vec<(&str, String)> = vec![
        ("company_name", context.company_name.clone()),
        ("website_content", context.website_text.clone()),
        ("news_text", context.render_news()),
        ("scraped_status", counts.scraped_status().to_string()),
        ("article_count", counts.article_count.to_string()),
    ];

    match request {
        ReportRequest::SalesOutreach { value_proposition } => {
            values.push(("val_prop_context", value_proposition.clone()));
        }
        ReportRequest::InterviewPrep {
            job_description,
            resume_text,
        } => {
            values.push(("job_description", job_description.clone()));
            values.push(("cv_text", resume_text.clone()));
        }
    }

    fill_placeholders(template, &values)
}

/// 单遍扫描替换占位符，替换进去的内容不会被再次展开
fn fill_placeholders(template: &str, values: &[(&str, String)]) -> String {
    let mut output = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (value, close))
        });

        match replaced {
            Some((value, close)) => {
                output.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                output.push('{');
                rest = after;
            }
        }
    }
    output.push_str(rest);
    output
}
