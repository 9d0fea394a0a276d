/// Tutor chat prompt: answer only from the study text.
pub fn ask_prompt(context: &str, query: &str) -> String {
    format!(
        r#"Actúa como un tutor experto de oposiciones. Tu única fuente de conocimiento es el texto que aparece a continuación y no puedes usar información externa.
Responde a la pregunta del alumno de forma clara, concisa y ciñéndote estrictamente al texto.
Si la respuesta no está en el texto, indica amablemente que el material de estudio no trata ese punto.

--- TEXTO DEL TEMARIO ---
{context}
---

--- PREGUNTA DEL ALUMNO ---
{query}
---

Respuesta concisa y directa:"#
    )
}

/// Prompt for a short explanation of a concept highlighted in a topic.
pub fn explain_prompt(title: &str, context: &str, concept: &str) -> String {
    format!(
        r#"Actúa como un tutor experto de oposiciones. El alumno ha resaltado un concepto mientras estudiaba el tema "{title}".
Explica el concepto en un máximo de tres párrafos breves, con lenguaje sencillo y apoyándote solo en el texto del tema. Si el texto no permite explicarlo, dilo sin inventar información.

--- TEXTO DEL TEMA ---
{context}
---

--- CONCEPTO RESALTADO ---
{concept}
---

Explicación:"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_prompt_embeds_context_and_query() {
        let prompt = ask_prompt("Artículo 1 de la Constitución", "¿Qué dice el artículo 1?");

        assert!(prompt.contains("--- TEXTO DEL TEMARIO ---\nArtículo 1 de la Constitución"));
        assert!(prompt.contains("--- PREGUNTA DEL ALUMNO ---\n¿Qué dice el artículo 1?"));
        assert!(!prompt.contains("correct_answer"));
    }

    #[test]
    fn test_explain_prompt_embeds_title_and_concept() {
        let prompt = explain_prompt("Tema 3", "Texto del tema", "silencio administrativo");

        assert!(prompt.contains("\"Tema 3\""));
        assert!(prompt.contains("--- CONCEPTO RESALTADO ---\nsilencio administrativo"));
    }
}
