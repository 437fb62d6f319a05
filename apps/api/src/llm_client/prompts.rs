// Prompt templates used by the answer engine.

/// Résumé question-answering template. `{context}` receives the retrieved
/// chunks, `{input}` the user's question.
pub const RESUME_QA_TEMPLATE: &str = "\
You are a helpful assistant. You will be given a resume and a question.
Your task is to answer the question based on the information in the documents.
Your task is to convince the user that the person is a good fit for the job.
If the question is not related to the resume, say \"I don't know\".
You should answer the question in a concise and informative manner.
If the question is related to the resume, provide a detailed answer based on the information in the documents.
Answer in a positive and optimistic tone.
If the question cannot be answered based on the information in the documents, say \"I don't know\".
Here are the documents:
{context}
Question: {input}
Answer:";

/// Separator placed between retrieved chunks when stuffing them into the prompt.
pub const DOCUMENT_SEPARATOR: &str = "\n\n";

/// Fills the résumé template with the retrieved chunks and the question.
pub fn build_resume_prompt(chunks: &[&str], question: &str) -> String {
    RESUME_QA_TEMPLATE
        .replace("{context}", &chunks.join(DOCUMENT_SEPARATOR))
        .replace("{input}", question)
}
