// ============================================================
// Layer 4 — Reply Templates
// ============================================================
// Two canned replies per intent. The ask workflow picks one at
// random and then personalises it with the conversation
// context, so templates are written in the informal "tú" form
// and start with "Hola" where a name could be inserted.

use rand::seq::SliceRandom;
use rand::Rng;

/// Reply used when a label has no templates
pub const FALLBACK_REPLY: &str = "No entiendo bien eso.";

const REPLIES: &[(&str, [&str; 2])] = &[
    ("saludo", [
        "¡Hola! ¿En qué puedo ayudarte hoy?",
        "¡Qué bueno verte! ¿Cómo estás?",
    ]),
    ("pregunta", [
        "Eso suena interesante, ¿puedes explicarlo mejor?",
        "Buena pregunta. Déjame pensar un segundo...",
    ]),
    ("clima", [
        "Parece que hace calor hoy. ¿Quieres que revise el pronóstico?",
        "El clima está cambiando bastante últimamente, ¿no crees?",
    ]),
    ("despedida", [
        "Nos vemos pronto.",
        "Cuídate mucho, ¡hasta luego!",
    ]),
    ("afición", [
        "Programar es una excelente manera de pasar el tiempo.",
        "Me gusta que tengas pasatiempos productivos.",
    ]),
    ("respuesta", [
        "Gracias por compartir eso.",
        "Entiendo. ¿Y qué más?",
    ]),
    ("reflexión", [
        "Totalmente de acuerdo contigo.",
        "Esa es una gran forma de verlo.",
    ]),
    ("pronóstico del tiempo", [
        "Creo que sí lloverá hoy. ¿Llevas paraguas?",
        "Dicen que el clima será soleado mañana.",
    ]),
];

/// All templates for `label` (empty when the label is unknown).
pub fn templates_for(label: &str) -> &'static [&'static str] {
    REPLIES
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, replies)| replies.as_slice())
        .unwrap_or(&[])
}

/// Pick one template for `label` at random.
pub fn reply_for<R: Rng + ?Sized>(label: &str, rng: &mut R) -> String {
    templates_for(label)
        .choose(rng)
        .copied()
        .unwrap_or(FALLBACK_REPLY)
        .to_string()
}
