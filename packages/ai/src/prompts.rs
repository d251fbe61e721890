// ABOUTME: Prompt builders for product document drafting
// ABOUTME: Research, PRD, and summary prompts enriched with iteration context

use canopy_products::{DocumentKind, IterationContext, ProductSnapshot};

/// Builds the generation prompt for one document kind.
pub fn build_prompt(
    kind: DocumentKind,
    product_name: &str,
    user_input: &str,
    context: &IterationContext,
) -> String {
    let mut prompt = match kind {
        DocumentKind::Research => research_prompt(product_name, user_input),
        DocumentKind::Prd => prd_prompt(product_name, user_input),
        DocumentKind::Summary => summary_prompt(product_name, user_input),
    };

    if let Some(section) = context_section(context) {
        prompt.push_str("\n\n");
        prompt.push_str(&section);
    }

    prompt
}

fn research_prompt(product_name: &str, user_input: &str) -> String {
    format!(
        r#"You are an AI Product Manager assistant. Your goal is to help define a new product feature or product.
The product/feature name is: "{product_name}".
Here is some user input/details about the feature provided by the product manager: "{user_input}"

Based on this information, generate a high-level Discovery Document.
The document should include the following sections. Provide content for each section:
1.  **Feature/Product Overview:** A brief description of the product or feature.
2.  **Core Logic/Functionality:** How the product or feature is expected to work at a high level, step-by-step if applicable.
3.  **High-Level Goals/Objectives:** What this product/feature aims to achieve (e.g., improve user engagement, solve a specific user problem, increase revenue, competitive advantage).
4.  **Key Assumptions:** Any critical assumptions being made about users, market conditions, existing infrastructure, or technology.
5.  **Out of Scope (for this MVP/initial phase):** Clearly list what this product/feature will *not* include in its initial release to manage expectations.
6.  **Potential Success Metrics (How to measure success):** How we might measure the success of this product/feature (e.g., DAU, retention, conversion rate, usage of specific features, customer satisfaction scores).

Format the output clearly using Markdown, with bold headings and bullet points where appropriate.
Ensure the content is detailed enough to serve as a strong starting point for a product manager."#
    )
}

fn prd_prompt(product_name: &str, user_input: &str) -> String {
    format!(
        r#"You are an AI Product Manager assistant. Write a Product Requirements Document (PRD) for: "{product_name}".
Additional direction from the product manager: "{user_input}"

The PRD should include:
1.  **Problem Statement:** The user problem this product addresses and why it matters now.
2.  **Target Users:** Who this is for, with primary and secondary personas.
3.  **Requirements:** Functional requirements as user stories with acceptance criteria, ordered by priority.
4.  **User Flows:** The key end-to-end flows, step by step.
5.  **Edge Cases and Error States:** What can go wrong and how the product should respond.
6.  **Release Criteria:** What must be true before this ships.

Format the output as Markdown with bold headings. Be specific and testable; avoid vague language."#
    )
}

fn summary_prompt(product_name: &str, user_input: &str) -> String {
    format!(
        r#"You are an AI Product Manager assistant. Write a concise launch summary for: "{product_name}".
Additional direction from the product manager: "{user_input}"

The summary should include:
1.  **What Shipped:** One paragraph describing the product or feature as released.
2.  **Key Decisions:** The most important product decisions made along the way and their rationale.
3.  **Outcomes:** Results against the original goals, with metrics where available.
4.  **Follow-ups:** Open items and recommended next iterations.

Keep it under one page of Markdown. Write for an executive audience."#
    )
}

/// Renders the parent and sibling iterations as prompt context.
///
/// Returns `None` for root products with no siblings, so their prompts
/// are identical to a standalone product's.
fn context_section(context: &IterationContext) -> Option<String> {
    if context.is_empty() {
        return None;
    }

    let mut section = String::from(
        "For additional context, this product is one iteration in a larger effort. \
         Use the documents below as background; stay consistent with them where it \
         makes sense and call out deliberate departures.\n",
    );

    if let Some(parent) = &context.parent {
        section.push_str(&format!("\n## Parent product: {}\n", parent.name));
        push_snapshot_documents(&mut section, parent);
    }

    for sibling in &context.siblings {
        section.push_str(&format!(
            "\n## Sibling iteration {}: {}\n",
            sibling.iteration_number, sibling.name
        ));
        push_snapshot_documents(&mut section, sibling);
    }

    Some(section)
}

fn push_snapshot_documents(section: &mut String, snapshot: &ProductSnapshot) {
    let documents = [
        ("Research", &snapshot.research_document),
        ("PRD", &snapshot.prd_document),
        ("Summary", &snapshot.summary_document),
    ];

    let mut any = false;
    for (label, document) in documents {
        if let Some(text) = document {
            section.push_str(&format!("\n### {}\n{}\n", label, text));
            any = true;
        }
    }

    if !any {
        section.push_str("\n(no documents drafted yet)\n");
    }
}
