// Canonical column set for the monthly SST table, plus the header
// normalization that lets us accept the accent/case/typo variants the
// source spreadsheets actually ship with.
use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Mes,
    Dotacion,
    HorasExtra,
    HorasAusencia,
    AccidentesCtp,
    DiasPerdidos,
    DiasCargo,
    ActosInseguros,
    CondicionesInseguras,
    InspeccionesProgramadas,
    InspeccionesEjecutadas,
    CapacitacionesProgramadas,
    CapacitacionesEjecutadas,
    AccionesAbiertas,
    AccionesCerradas,
    ExamenesProgramados,
    ExamenesRealizados,
    FechaUltimoAccidente,
}

impl Column {
    pub const ALL: [Column; 18] = [
        Column::Mes,
        Column::Dotacion,
        Column::HorasExtra,
        Column::HorasAusencia,
        Column::AccidentesCtp,
        Column::DiasPerdidos,
        Column::DiasCargo,
        Column::ActosInseguros,
        Column::CondicionesInseguras,
        Column::InspeccionesProgramadas,
        Column::InspeccionesEjecutadas,
        Column::CapacitacionesProgramadas,
        Column::CapacitacionesEjecutadas,
        Column::AccionesAbiertas,
        Column::AccionesCerradas,
        Column::ExamenesProgramados,
        Column::ExamenesRealizados,
        Column::FechaUltimoAccidente,
    ];

    /// Every column holding a plain numeric count, i.e. everything except
    /// the two date columns.
    pub const NUMERIC: [Column; 16] = [
        Column::Dotacion,
        Column::HorasExtra,
        Column::HorasAusencia,
        Column::AccidentesCtp,
        Column::DiasPerdidos,
        Column::DiasCargo,
        Column::ActosInseguros,
        Column::CondicionesInseguras,
        Column::InspeccionesProgramadas,
        Column::InspeccionesEjecutadas,
        Column::CapacitacionesProgramadas,
        Column::CapacitacionesEjecutadas,
        Column::AccionesAbiertas,
        Column::AccionesCerradas,
        Column::ExamenesProgramados,
        Column::ExamenesRealizados,
    ];

    /// Canonical header as written when we persist the table.
    pub fn header(self) -> &'static str {
        match self {
            Column::Mes => "MES",
            Column::Dotacion => "DOTACION",
            Column::HorasExtra => "HORAS EXTRA",
            Column::HorasAusencia => "HORAS AUSENCIA",
            Column::AccidentesCtp => "ACCIDENTES CTP",
            Column::DiasPerdidos => "DIAS PERDIDOS",
            Column::DiasCargo => "DIAS CARGO",
            Column::ActosInseguros => "ACTOS INSEGUROS",
            Column::CondicionesInseguras => "CONDICIONES INSEGURAS",
            Column::InspeccionesProgramadas => "INSPECCIONES PROGRAMADAS",
            Column::InspeccionesEjecutadas => "INSPECCIONES EJECUTADAS",
            Column::CapacitacionesProgramadas => "CAPACITACIONES PROGRAMADAS",
            Column::CapacitacionesEjecutadas => "CAPACITACIONES EJECUTADAS",
            Column::AccionesAbiertas => "ACCIONES ABIERTAS",
            Column::AccionesCerradas => "ACCIONES CERRADAS",
            Column::ExamenesProgramados => "EXAMENES PROGRAMADOS",
            Column::ExamenesRealizados => "EXAMENES REALIZADOS",
            Column::FechaUltimoAccidente => "FECHA ULTIMO ACCIDENTE",
        }
    }
}

/// Uppercase a header, fold the Spanish diacritics and collapse runs of
/// whitespace, so `" Días  perdidos "` and `"DIAS PERDIDOS"` compare equal.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for c in raw.trim().chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        for u in c.to_uppercase() {
            out.push(match u {
                'Á' => 'A',
                'É' => 'E',
                'Í' => 'I',
                'Ó' => 'O',
                'Ú' => 'U',
                'Ü' => 'U',
                'Ñ' => 'N',
                other => other,
            });
        }
    }
    out
}

// Normalized header -> column. Canonical names plus the variants observed
// in real exports, including the long-lived "EJECUTUDAS" misspelling.
static LOOKUP: Lazy<HashMap<&'static str, Column>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, Column> = HashMap::new();
    for col in Column::ALL {
        m.insert(col.header(), col);
    }
    m.insert("ACCIDENTES", Column::AccidentesCtp);
    m.insert("ACCIDENTES CON TIEMPO PERDIDO", Column::AccidentesCtp);
    m.insert("TRABAJADORES", Column::Dotacion);
    m.insert("DOTACION PROMEDIO", Column::Dotacion);
    m.insert("HORAS EXTRAS", Column::HorasExtra);
    m.insert("HORAS DE AUSENCIA", Column::HorasAusencia);
    m.insert("DIAS DE CARGO", Column::DiasCargo);
    m.insert("CAPACITACIONES EJECUTUDAS", Column::CapacitacionesEjecutadas);
    m.insert("FECHA DEL ULTIMO ACCIDENTE", Column::FechaUltimoAccidente);
    m.insert("EXAMENES OCUPACIONALES PROGRAMADOS", Column::ExamenesProgramados);
    m.insert("EXAMENES OCUPACIONALES REALIZADOS", Column::ExamenesRealizados);
    m
});

/// Map a raw header cell to its canonical column, if it is one we know.
pub fn resolve(raw: &str) -> Option<Column> {
    LOOKUP.get(normalize(raw).as_str()).copied()
}

/// Derived-value columns some exports carry. We recognize them only to
/// report that they were ignored: indices are always recomputed from the
/// base fields, never read back.
pub fn is_derived(raw: &str) -> bool {
    matches!(
        normalize(raw).as_str(),
        "HHT"
            | "INDICE DE FRECUENCIA"
            | "INDICE DE SEVERIDAD"
            | "INDICE DE GRAVEDAD"
            | "TASA DE ACCIDENTABILIDAD"
            | "TASA DE SINIESTRALIDAD"
    )
}

/// Form-tool bookkeeping columns that carry no observation data.
pub fn is_junk(raw: &str) -> bool {
    matches!(normalize(raw).as_str(), "TIMESTAMP" | "MARCA TEMPORAL")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_accents_case_and_whitespace() {
        assert_eq!(normalize("  Días   perdidos "), "DIAS PERDIDOS");
        assert_eq!(normalize("Índice de Gravedad"), "INDICE DE GRAVEDAD");
        assert_eq!(normalize("dotación"), "DOTACION");
    }

    #[test]
    fn resolve_accepts_canonical_and_variant_headers() {
        assert_eq!(resolve("DIAS PERDIDOS"), Some(Column::DiasPerdidos));
        assert_eq!(resolve("Días Perdidos"), Some(Column::DiasPerdidos));
        assert_eq!(resolve("Accidentes"), Some(Column::AccidentesCtp));
        assert_eq!(resolve("Fecha del ultimo accidente"), Some(Column::FechaUltimoAccidente));
        assert_eq!(resolve("Presupuesto"), None);
    }

    #[test]
    fn resolve_accepts_known_misspelling() {
        assert_eq!(
            resolve("CAPACITACIONES EJECUTUDAS"),
            Some(Column::CapacitacionesEjecutadas)
        );
    }

    #[test]
    fn derived_and_junk_headers_are_classified() {
        assert!(is_derived("Indice de Frecuencia"));
        assert!(is_derived("indice de severidad"));
        assert!(!is_derived("ACCIDENTES CTP"));
        assert!(is_junk("Marca temporal"));
        assert!(!is_junk("MES"));
    }
}
