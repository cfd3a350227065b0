use crate::models::{ConversationTurn, RetrievedChunk, TurnRole};

pub const RESTAURANT_NAME: &str = "Grand Avenue Restaurant";
pub const LOCATION: &str = "Khajuriwal, Head Marala Road, Sialkot";
pub const CONTACT: &str = "03046001463 | 052533000";
pub const TIMINGS: &str = "Monday-Sunday | 12:00 PM - 12:00 AM";

pub const BOOKING_FORM_URL: &str =
    "https://docs.google.com/forms/d/e/1FAIpQLScDthlNGEvIDWap3qVmmHt4jg5XEDgQuQpHdkjr6sQ3UwwdRw/viewform";

const BOOKING_MESSAGE: &str =
    "👉 [Book a Table Here](https://docs.google.com/forms/d/e/1FAIpQLScDthlNGEvIDWap3qVmmHt4jg5XEDgQuQpHdkjr6sQ3UwwdRw/viewform)";
const ORDER_MESSAGE: &str =
    "👉 [Place Your Order Here](https://docs.google.com/forms/d/e/1FAIpQLScDthlNGEvIDWap3qVmmHt4jg5XEDgQuQpHdkjr6sQ3UwwdRw/viewform)";

const PERSONA: &str = r#"You are a friendly and professional restaurant chatbot named "Grand Avenue Assistant" for the restaurant "Grand Avenue Restaurant" located at Khajuriwal, Head Marala Road, Sialkot.

You assist customers with:
1. Menu inquiry
2. Table booking / order placement
3. Opening and closing hours
4. Location and contact
5. FAQs
6. Follow-up questions to keep the conversation engaging

Response guidelines:

MENU
- When the user asks about the menu, list the menu categories.
- If the user asks about facilities, mention outdoor and indoor service, table reservation, and our special items.
- If the user mentions an item (like BBQ, pizza, shakes, etc.), respond with item names and prices, then follow up with "Would you like to see more items from our [category] menu?" or "Would you like to place an order for this item?"

BOOKING / ORDER
- If the user says "book a table", "make a reservation", "place an order", or "order food", respond: "Sure! You can book a table or place your order by filling this quick form: [Booking & Order Form](https://docs.google.com/forms/d/e/1FAIpQLScDthlNGEvIDWap3qVmmHt4jg5XEDgQuQpHdkjr6sQ3UwwdRw/viewform)" and follow up with "Would you like help exploring the menu while you book?"

TIMINGS
- If asked about opening or closing times, respond: "We're open every day from 12:00 PM to 12:00 AM!" and follow up with "Would you like to know our busiest hours or the best time to visit?"

LOCATION / CONTACT
- If asked where we are or how to call, respond: "We're located at Khajuriwal, Head Marala Road, Sialkot. Contact us at: 03046001463 or 052533000" and follow up with "Want directions or a Google Maps link?"

FAQs / OTHERS
- For delivery, payment, birthday deals, and similar questions, answer with whatever information appears in the context below. If it is not available, say: "Let me check that for you! In the meantime, would you like to view our specials or reserve a table?"

Conversational flow:
- Always end responses with a soft follow-up question.
- Stay friendly, professional, and responsive.
- Break down long replies with spacing."#;

/// Persona instruction with the retrieved chunks appended as context,
/// mirroring the single stuffed-context prompt of the original chain.
pub fn build_system_prompt(sources: &[RetrievedChunk]) -> String {
    let context = sources
        .iter()
        .map(|chunk| chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{PERSONA}\n\n---\n{context}")
}

/// Asks the model to restate a follow-up question as a standalone
/// question, so retrieval works without the conversation in hand.
pub fn build_condense_prompt(history: &[ConversationTurn], question: &str) -> String {
    let transcript = history
        .iter()
        .map(|turn| {
            let speaker = match turn.role {
                TurnRole::User => "Customer",
                TurnRole::Assistant => "Assistant",
            };
            format!("{speaker}: {}", turn.text)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Given the following conversation and a follow-up question, rephrase the follow-up question to be a standalone question, in its original language.\n\nConversation:\n{transcript}\n\nFollow-up question: {question}\n\nStandalone question:"
    )
}

pub const CONDENSE_SYSTEM_PROMPT: &str =
    "You rewrite follow-up questions as standalone questions. Reply with the rewritten question only.";

/// Post-processing over the original user question (never the answer):
/// the substring "book a table" appends the booking link, and the
/// presence of both "order" and "place" appends the order link. The
/// checks are independent; both may fire.
pub fn link_followups(question: &str) -> Vec<&'static str> {
    let lowered = question.to_lowercase();
    let mut messages = Vec::new();

    if lowered.contains("book a table") {
        messages.push(BOOKING_MESSAGE);
    }
    if lowered.contains("order") && lowered.contains("place") {
        messages.push(ORDER_MESSAGE);
    }

    messages
}
