use rand::{Rng, seq::SliceRandom};

/// Extra steering appended to every question prompt, one picked at random per call
pub const VARIETY_INSTRUCTIONS: &[&str] = &[
    "enfócate en un detalle concreto o en un dato numérico del texto.",
    "basa la pregunta en una definición clave que aparezca en el documento.",
    "pregunta por las funciones o competencias de algún órgano descrito.",
    "compara dos conceptos que se mencionen en el texto.",
    "pregunta por una excepción a alguna regla general descrita.",
    "céntrate en un plazo, fecha o período de tiempo mencionado.",
];

pub fn pick_variety<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    VARIETY_INSTRUCTIONS
        .choose(rng)
        .copied()
        .unwrap_or(VARIETY_INSTRUCTIONS[0])
}

/// Pick up to `count` distinct fragments at random.
pub fn sample_fragments<'a, R: Rng + ?Sized>(
    fragments: &[&'a str],
    count: usize,
    rng: &mut R,
) -> Vec<&'a str> {
    fragments
        .choose_multiple(rng, count.min(fragments.len()))
        .copied()
        .collect()
}

/// Prompt asking for one question per fragment, as a JSON array.
pub fn question_prompt(context: &str, fragments: &[&str], variety: &str) -> String {
    let numbered = fragments
        .iter()
        .enumerate()
        .map(|(i, fragment)| format!("--- FRAGMENTO {} ---\n{}\n---", i + 1, fragment))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"Actúa como un tribunal de oposición muy riguroso. Tu objetivo es redactar preguntas de test muy específicas.

Recibes dos tipos de información:
1. El CONTEXTO COMPLETO del tema, para que entiendas el marco general.
2. {count} FRAGMENTO(S) numerados del tema.

Para cada fragmento, redacta una pregunta tipo test basada única y exclusivamente en la información de ese fragmento. Las opciones incorrectas pueden apoyarse en el contexto general para ser distractores creíbles, pero la respuesta correcta TIENE que estar en el fragmento. Al redactar, {variety}

Requisitos estrictos de formato:
- Responde solo con un array JSON válido, sin texto adicional.
- Un objeto por fragmento: [{{"fragment": 1, "question": "...", "options": {{"A": "...", "B": "...", "C": "...", "D": "..."}}, "correct_answer": "LETRA", "explanation": "..."}}]

--- CONTEXTO COMPLETO ---
{context}
---

{numbered}
"#,
        count = fragments.len(),
    )
}
