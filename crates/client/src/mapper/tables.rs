//! Static category-mapping tables.
//!
//! Category codes and names come from the product catalog (Spanish-first,
//! with English search terms mixed in where the image service indexes them
//! better).

use super::BusinessDomain;

/// Mapping for an exact category code.
pub struct CodeMapping {
    pub code: &'static str,
    pub activities: &'static [&'static str],
    pub domain: BusinessDomain,
    pub confidence: f32,
}

/// Mapping for a category name (exact or substring).
pub struct NameMapping {
    pub name: &'static str,
    pub activities: &'static [&'static str],
    pub domain: BusinessDomain,
}

/// Fallback when neither code nor name matches anything.
pub const DEFAULT_ACTIVITIES: &[&str] = &["retail", "comercio", "negocio"];

pub const CODE_MAPPINGS: &[CodeMapping] = &[
    CodeMapping { code: "CAFE", activities: &["café", "coffee", "cafetería"], domain: BusinessDomain::Food, confidence: 0.95 },
    CodeMapping { code: "RESTAURANTE", activities: &["restaurante", "comida", "restaurant"], domain: BusinessDomain::Food, confidence: 0.95 },
    CodeMapping { code: "PIZZERIA", activities: &["pizzeria", "pizza", "italian food"], domain: BusinessDomain::Food, confidence: 0.95 },
    CodeMapping { code: "PANADERIA", activities: &["panadería", "pan", "bakery"], domain: BusinessDomain::Food, confidence: 0.9 },
    CodeMapping { code: "FARMACIA", activities: &["farmacia", "pharmacy", "salud"], domain: BusinessDomain::Health, confidence: 0.9 },
    CodeMapping { code: "OPTICA", activities: &["óptica", "lentes", "glasses"], domain: BusinessDomain::Health, confidence: 0.85 },
    CodeMapping { code: "LIBRERIA", activities: &["librería", "libros", "books"], domain: BusinessDomain::Education, confidence: 0.85 },
    CodeMapping { code: "ROPA", activities: &["ropa", "moda", "clothing"], domain: BusinessDomain::Retail, confidence: 0.9 },
    CodeMapping { code: "ZAPATERIA", activities: &["zapatería", "zapatos", "shoes"], domain: BusinessDomain::Retail, confidence: 0.85 },
    CodeMapping { code: "FERRETERIA", activities: &["ferretería", "herramientas", "hardware"], domain: BusinessDomain::Retail, confidence: 0.85 },
    CodeMapping { code: "FLORERIA", activities: &["floristería", "flores", "flowers"], domain: BusinessDomain::Retail, confidence: 0.85 },
    CodeMapping { code: "PELUQUERIA", activities: &["peluquería", "belleza", "hair salon"], domain: BusinessDomain::Services, confidence: 0.9 },
    CodeMapping { code: "TALLER", activities: &["taller mecánico", "autos", "garage"], domain: BusinessDomain::Services, confidence: 0.85 },
    CodeMapping { code: "GIMNASIO", activities: &["gimnasio", "fitness", "gym"], domain: BusinessDomain::Services, confidence: 0.9 },
];

pub const NAME_MAPPINGS: &[NameMapping] = &[
    NameMapping { name: "pizzeria", activities: &["pizzeria", "pizza", "italian food"], domain: BusinessDomain::Food },
    NameMapping { name: "pizzería", activities: &["pizzeria", "pizza", "italian food"], domain: BusinessDomain::Food },
    NameMapping { name: "café", activities: &["café", "coffee", "cafetería"], domain: BusinessDomain::Food },
    NameMapping { name: "cafetería", activities: &["café", "coffee", "cafetería"], domain: BusinessDomain::Food },
    NameMapping { name: "restaurante", activities: &["restaurante", "comida", "restaurant"], domain: BusinessDomain::Food },
    NameMapping { name: "panadería", activities: &["panadería", "pan", "bakery"], domain: BusinessDomain::Food },
    NameMapping { name: "heladería", activities: &["helado", "ice cream", "postre"], domain: BusinessDomain::Food },
    NameMapping { name: "farmacia", activities: &["farmacia", "pharmacy", "salud"], domain: BusinessDomain::Health },
    NameMapping { name: "clínica", activities: &["clínica", "salud", "consultorio"], domain: BusinessDomain::Health },
    NameMapping { name: "librería", activities: &["librería", "libros", "books"], domain: BusinessDomain::Education },
    NameMapping { name: "academia", activities: &["academia", "educación", "aula"], domain: BusinessDomain::Education },
    NameMapping { name: "ropa", activities: &["ropa", "moda", "clothing"], domain: BusinessDomain::Retail },
    NameMapping { name: "boutique", activities: &["boutique", "moda", "ropa"], domain: BusinessDomain::Retail },
    NameMapping { name: "zapatería", activities: &["zapatería", "zapatos", "shoes"], domain: BusinessDomain::Retail },
    NameMapping { name: "ferretería", activities: &["ferretería", "herramientas", "hardware"], domain: BusinessDomain::Retail },
    NameMapping { name: "peluquería", activities: &["peluquería", "belleza", "hair salon"], domain: BusinessDomain::Services },
    NameMapping { name: "taller", activities: &["taller mecánico", "autos", "garage"], domain: BusinessDomain::Services },
    NameMapping { name: "gimnasio", activities: &["gimnasio", "fitness", "gym"], domain: BusinessDomain::Services },
];

/// Up to five contextual terms appended per business domain.
pub fn contextual_terms(domain: BusinessDomain) -> &'static [&'static str] {
    match domain {
        BusinessDomain::Food => &["gastronomía", "cocina", "plato", "ingredientes", "mesa"],
        BusinessDomain::Retail => &["tienda", "vitrina", "producto", "compras", "local comercial"],
        BusinessDomain::Services => &["servicio", "atención al cliente", "profesional", "oficina", "equipo"],
        BusinessDomain::Health => &["salud", "bienestar", "cuidado", "consulta", "clínica"],
        BusinessDomain::Education => &["educación", "aprendizaje", "aula", "estudio", "lectura"],
        BusinessDomain::Other => &["negocio", "empresa", "trabajo", "local", "servicio"],
    }
}
