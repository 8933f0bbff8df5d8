// ============================================================
// Layer 4 — Built-in Training Corpus
// ============================================================
// The static (text, label) table the assistant ships with,
// plus the ordered class list. The position of a label in
// CLASSES is the index of its output neuron, so reordering
// this list invalidates every saved model (the checkpoint
// loader detects the shape change only when the COUNT differs).

use anyhow::Result;

use crate::domain::intent::{Corpus, LabeledUtterance};
use crate::domain::traits::CorpusSource;

/// Output classes, in output-neuron order.
pub const CLASSES: [&str; 8] = [
    "saludo",
    "pregunta",
    "clima",
    "despedida",
    "afición",
    "respuesta",
    "reflexión",
    "pronóstico del tiempo",
];

const EXAMPLES: &[(&str, &str)] = &[
    // saludo
    ("hola", "saludo"),
    ("hola como estas", "saludo"),
    ("buenos dias", "saludo"),
    ("buenas tardes", "saludo"),
    ("que tal", "saludo"),
    ("hey hola amigo", "saludo"),
    ("me llamo ana", "saludo"),
    // pregunta
    ("que es una red neuronal", "pregunta"),
    ("como funciona esto", "pregunta"),
    ("puedes explicarme algo", "pregunta"),
    ("por que pasa eso", "pregunta"),
    ("tengo una duda", "pregunta"),
    ("sabes como programar en python", "pregunta"),
    // clima
    ("hace calor hoy", "clima"),
    ("hace mucho frio", "clima"),
    ("esta soleado afuera", "clima"),
    ("que calor tan fuerte", "clima"),
    ("el clima esta raro", "clima"),
    // despedida
    ("adios", "despedida"),
    ("hasta luego", "despedida"),
    ("nos vemos", "despedida"),
    ("chao", "despedida"),
    ("me tengo que ir", "despedida"),
    ("hasta mañana", "despedida"),
    // afición
    ("me gusta programar", "afición"),
    ("me gusta tocar la guitarra", "afición"),
    ("juego futbol los fines de semana", "afición"),
    ("mi pasatiempo es leer", "afición"),
    ("disfruto cantar canciones", "afición"),
    // respuesta
    ("si", "respuesta"),
    ("no", "respuesta"),
    ("claro", "respuesta"),
    ("bien gracias", "respuesta"),
    ("estoy bien", "respuesta"),
    ("mas o menos", "respuesta"),
    // reflexión
    ("la vida es corta", "reflexión"),
    ("creo que todo pasa por algo", "reflexión"),
    ("hay que disfrutar cada momento", "reflexión"),
    ("aprender nunca termina", "reflexión"),
    ("el tiempo lo cura todo", "reflexión"),
    // pronóstico del tiempo
    ("va a llover hoy", "pronóstico del tiempo"),
    ("lloverá mañana", "pronóstico del tiempo"),
    ("cual es el pronostico", "pronóstico del tiempo"),
    ("necesito paraguas", "pronóstico del tiempo"),
    ("como estara el tiempo mañana", "pronóstico del tiempo"),
];

/// The compiled-in corpus.
pub struct BuiltinCorpus;

impl BuiltinCorpus {
    pub fn corpus() -> Corpus {
        Corpus::new(
            CLASSES.iter().map(|c| c.to_string()).collect(),
            EXAMPLES
                .iter()
                .map(|(text, label)| LabeledUtterance::new(*text, *label))
                .collect(),
        )
    }
}

impl CorpusSource for BuiltinCorpus {
    fn load_corpus(&self) -> Result<Corpus> {
        Ok(Self::corpus())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_label_is_a_class() {
        let corpus = BuiltinCorpus::corpus();
        for ex in &corpus.examples {
            assert!(corpus.classes.contains(&ex.label), "unknown label {}", ex.label);
        }
    }

    #[test]
    fn test_every_class_has_examples() {
        let corpus = BuiltinCorpus::corpus();
        for class in &corpus.classes {
            assert!(corpus.examples.iter().any(|e| &e.label == class), "no examples for {class}");
        }
    }
}
