use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tabled::Tabled;

use crate::columns::Column;

/// One monthly SST observation for the site.
///
/// Only base fields live here; HHT and the four indices are derived on
/// demand (see `indices`) and are never read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// First day of the reported month.
    pub month: NaiveDate,
    /// Average workers on payroll during the month.
    pub headcount: f64,
    pub overtime_hours: f64,
    pub absence_hours: f64,
    /// Lost-time accidents (CTP).
    pub lost_time_accidents: f64,
    pub lost_days: f64,
    /// Days charged for fatalities or permanent disability.
    pub charged_days: f64,
    pub unsafe_acts: f64,
    pub unsafe_conditions: f64,
    pub inspections_planned: f64,
    pub inspections_executed: f64,
    pub trainings_planned: f64,
    pub trainings_executed: f64,
    pub actions_open: f64,
    pub actions_closed: f64,
    pub exams_planned: f64,
    pub exams_done: f64,
    pub last_accident_date: Option<NaiveDate>,
}

impl Observation {
    /// A record for `month` with every count at zero, ready to be filled
    /// in field by field by the loader or the entry form.
    pub fn empty(month: NaiveDate) -> Observation {
        Observation {
            month,
            headcount: 0.0,
            overtime_hours: 0.0,
            absence_hours: 0.0,
            lost_time_accidents: 0.0,
            lost_days: 0.0,
            charged_days: 0.0,
            unsafe_acts: 0.0,
            unsafe_conditions: 0.0,
            inspections_planned: 0.0,
            inspections_executed: 0.0,
            trainings_planned: 0.0,
            trainings_executed: 0.0,
            actions_open: 0.0,
            actions_closed: 0.0,
            exams_planned: 0.0,
            exams_done: 0.0,
            last_accident_date: None,
        }
    }

    pub fn year(&self) -> i32 {
        self.month.year()
    }

    pub fn month_number(&self) -> u32 {
        self.month.month()
    }

    /// Mutable access to a numeric field by column, shared by the loader
    /// and the single-field editor. Returns `None` for the two date
    /// columns, which need their own parsing.
    pub fn numeric_field_mut(&mut self, column: Column) -> Option<&mut f64> {
        match column {
            Column::Dotacion => Some(&mut self.headcount),
            Column::HorasExtra => Some(&mut self.overtime_hours),
            Column::HorasAusencia => Some(&mut self.absence_hours),
            Column::AccidentesCtp => Some(&mut self.lost_time_accidents),
            Column::DiasPerdidos => Some(&mut self.lost_days),
            Column::DiasCargo => Some(&mut self.charged_days),
            Column::ActosInseguros => Some(&mut self.unsafe_acts),
            Column::CondicionesInseguras => Some(&mut self.unsafe_conditions),
            Column::InspeccionesProgramadas => Some(&mut self.inspections_planned),
            Column::InspeccionesEjecutadas => Some(&mut self.inspections_executed),
            Column::CapacitacionesProgramadas => Some(&mut self.trainings_planned),
            Column::CapacitacionesEjecutadas => Some(&mut self.trainings_executed),
            Column::AccionesAbiertas => Some(&mut self.actions_open),
            Column::AccionesCerradas => Some(&mut self.actions_closed),
            Column::ExamenesProgramados => Some(&mut self.exams_planned),
            Column::ExamenesRealizados => Some(&mut self.exams_done),
            Column::Mes | Column::FechaUltimoAccidente => None,
        }
    }

    pub fn numeric_field(&self, column: Column) -> Option<f64> {
        match column {
            Column::Dotacion => Some(self.headcount),
            Column::HorasExtra => Some(self.overtime_hours),
            Column::HorasAusencia => Some(self.absence_hours),
            Column::AccidentesCtp => Some(self.lost_time_accidents),
            Column::DiasPerdidos => Some(self.lost_days),
            Column::DiasCargo => Some(self.charged_days),
            Column::ActosInseguros => Some(self.unsafe_acts),
            Column::CondicionesInseguras => Some(self.unsafe_conditions),
            Column::InspeccionesProgramadas => Some(self.inspections_planned),
            Column::InspeccionesEjecutadas => Some(self.inspections_executed),
            Column::CapacitacionesProgramadas => Some(self.trainings_planned),
            Column::CapacitacionesEjecutadas => Some(self.trainings_executed),
            Column::AccionesAbiertas => Some(self.actions_open),
            Column::AccionesCerradas => Some(self.actions_closed),
            Column::ExamenesProgramados => Some(self.exams_planned),
            Column::ExamenesRealizados => Some(self.exams_done),
            Column::Mes | Column::FechaUltimoAccidente => None,
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MonthlyIndexRow {
    #[serde(rename = "Mes")]
    #[tabled(rename = "Mes")]
    pub month: String,
    #[serde(rename = "Dotacion")]
    #[tabled(rename = "Dotacion")]
    pub headcount: String,
    #[serde(rename = "HHT")]
    #[tabled(rename = "HHT")]
    pub hht: String,
    #[serde(rename = "TasaAccidentabilidad")]
    #[tabled(rename = "TasaAccidentabilidad")]
    pub accident_rate: String,
    #[serde(rename = "TasaSiniestralidad")]
    #[tabled(rename = "TasaSiniestralidad")]
    pub severity_rate: String,
    #[serde(rename = "IndiceFrecuencia")]
    #[tabled(rename = "IndiceFrecuencia")]
    pub frequency_index: String,
    #[serde(rename = "IndiceGravedad")]
    #[tabled(rename = "IndiceGravedad")]
    pub gravity_index: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct YtdRollupRow {
    #[serde(rename = "Mes")]
    #[tabled(rename = "Mes")]
    pub month: String,
    #[serde(rename = "MesesAcumulados")]
    #[tabled(rename = "MesesAcumulados")]
    pub months_observed: usize,
    #[serde(rename = "AccidentesAcum")]
    #[tabled(rename = "AccidentesAcum")]
    pub total_accidents: String,
    #[serde(rename = "DiasPerdidosAcum")]
    #[tabled(rename = "DiasPerdidosAcum")]
    pub total_lost_days: String,
    #[serde(rename = "HHTAcum")]
    #[tabled(rename = "HHTAcum")]
    pub total_hht: String,
    #[serde(rename = "TasaAccidentabilidad")]
    #[tabled(rename = "TasaAccidentabilidad")]
    pub accident_rate: String,
    #[serde(rename = "TasaSiniestralidad")]
    #[tabled(rename = "TasaSiniestralidad")]
    pub severity_rate: String,
    #[serde(rename = "IndiceFrecuencia")]
    #[tabled(rename = "IndiceFrecuencia")]
    pub frequency_index: String,
    #[serde(rename = "IndiceGravedad")]
    #[tabled(rename = "IndiceGravedad")]
    pub gravity_index: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ComplianceRow {
    #[serde(rename = "Mes")]
    #[tabled(rename = "Mes")]
    pub month: String,
    #[serde(rename = "InspProg")]
    #[tabled(rename = "InspProg")]
    pub inspections_planned: String,
    #[serde(rename = "InspEjec")]
    #[tabled(rename = "InspEjec")]
    pub inspections_executed: String,
    #[serde(rename = "CumplInsp")]
    #[tabled(rename = "CumplInsp")]
    pub inspection_compliance: String,
    #[serde(rename = "CapProg")]
    #[tabled(rename = "CapProg")]
    pub trainings_planned: String,
    #[serde(rename = "CapEjec")]
    #[tabled(rename = "CapEjec")]
    pub trainings_executed: String,
    #[serde(rename = "CumplCap")]
    #[tabled(rename = "CumplCap")]
    pub training_compliance: String,
    #[serde(rename = "CierreAcciones")]
    #[tabled(rename = "CierreAcciones")]
    pub action_closure: String,
    #[serde(rename = "CoberturaExamenes")]
    #[tabled(rename = "CoberturaExamenes")]
    pub exam_coverage: String,
}

/// Year-level roll-up written to `summary.json`. Raw numbers, no display
/// formatting, so downstream consumers can parse it.
#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub year: i32,
    pub months_reported: usize,
    pub total_accidents: i64,
    pub total_lost_days: f64,
    pub total_unsafe_acts: i64,
    pub total_unsafe_conditions: i64,
    pub days_without_accident: Option<i64>,
    pub accident_rate: Option<f64>,
    pub severity_rate: Option<f64>,
    pub frequency_index: Option<f64>,
    pub gravity_index: Option<f64>,
}
