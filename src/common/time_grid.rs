// src/common/time_grid.rs

// Utilitários puros de grade de calendário (semana começando na segunda).
// Nenhuma função aqui tem efeito colateral: a visão mensal e o assistente
// recalculam a grade explicitamente depois de cada mutação confirmada.

use chrono::{Datelike, Duration, NaiveDate};

// Uma célula da grade mensal de 7 colunas. As células de preenchimento
// (mês anterior/seguinte) carregam a data vizinha mas não o número do dia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCell {
    pub day_number: Option<u32>,
    pub is_current_month: bool,
    pub date: NaiveDate,
}

impl MonthCell {
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Segunda-feira da semana que contém `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_from_monday = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(days_from_monday)
}

/// Primeiro dia do mês, ou None para (ano, mês) inválido.
pub fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Quantos dias o mês tem (28..=31).
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = first_of_month(year, month)?;
    let next = if month == 12 {
        first_of_month(year + 1, 1)?
    } else {
        first_of_month(year, month + 1)?
    };
    Some((next - first).num_days() as u32)
}

/// Todas as datas reais do mês, em ordem.
pub fn month_days(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = first_of_month(year, month) else {
        return Vec::new();
    };
    let Some(total) = days_in_month(year, month) else {
        return Vec::new();
    };
    (0..total)
        .map(|offset| first + Duration::days(offset as i64))
        .collect()
}

/// Grade mensal alinhada em colunas Seg..Dom, preenchida nas duas pontas com
/// os meses vizinhos até o comprimento ser múltiplo de 7.
///
/// Meses que começam na segunda-feira produzem zero células de preenchimento
/// à esquerda; meses curtos e longos (28 a 31 dias) sempre fecham a última
/// linha completa.
pub fn month_grid(year: i32, month: u32) -> Vec<MonthCell> {
    let Some(first) = first_of_month(year, month) else {
        return Vec::new();
    };
    let Some(total) = days_in_month(year, month) else {
        return Vec::new();
    };

    let lead = first.weekday().num_days_from_monday() as i64;
    let mut cells = Vec::with_capacity((lead as usize + total as usize).div_ceil(7) * 7);

    // Cauda do mês anterior
    for offset in (1..=lead).rev() {
        cells.push(MonthCell {
            day_number: None,
            is_current_month: false,
            date: first - Duration::days(offset),
        });
    }

    // Os dias reais do mês
    for day in 0..total {
        cells.push(MonthCell {
            day_number: Some(day + 1),
            is_current_month: true,
            date: first + Duration::days(day as i64),
        });
    }

    // Começo do mês seguinte, até fechar a linha
    let mut next = first + Duration::days(total as i64);
    while cells.len() % 7 != 0 {
        cells.push(MonthCell {
            day_number: None,
            is_current_month: false,
            date: next,
        });
        next += Duration::days(1);
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_start_volta_para_segunda() {
        // 2025-03-05 é uma quarta-feira
        assert_eq!(week_start(date(2025, 3, 5)), date(2025, 3, 3));
        // Segunda é ponto fixo
        assert_eq!(week_start(date(2025, 3, 3)), date(2025, 3, 3));
        // Domingo pertence à semana que começou 6 dias antes
        assert_eq!(week_start(date(2025, 3, 9)), date(2025, 3, 3));
        // Virada de mês
        assert_eq!(week_start(date(2025, 3, 1)), date(2025, 2, 24));
    }

    #[test]
    fn grade_sempre_multiplo_de_sete() {
        for year in [2024, 2025, 2026] {
            for month in 1..=12 {
                let grid = month_grid(year, month);
                assert!(!grid.is_empty());
                assert_eq!(grid.len() % 7, 0, "{}-{} quebrou a grade", year, month);
            }
        }
    }

    #[test]
    fn mes_que_comeca_na_segunda_nao_tem_preenchimento_inicial() {
        // Setembro de 2025 começa numa segunda-feira
        let grid = month_grid(2025, 9);
        assert_eq!(grid[0].day_number, Some(1));
        assert!(grid[0].is_current_month);
    }

    #[test]
    fn dias_reais_em_ordem_estrita_e_completos() {
        let grid = month_grid(2025, 2); // 28 dias, começa num sábado
        let reais: Vec<u32> = grid
            .iter()
            .filter(|c| c.is_current_month)
            .map(|c| c.day_number.unwrap())
            .collect();
        assert_eq!(reais.len(), 28);
        assert!(reais.windows(2).all(|w| w[0] < w[1]));
        // 5 células de cauda de janeiro antes do dia 1
        assert_eq!(grid.iter().take_while(|c| !c.is_current_month).count(), 5);
    }

    #[test]
    fn preenchimento_carrega_datas_dos_meses_vizinhos() {
        let grid = month_grid(2025, 3); // 1º de março de 2025 é um sábado
        assert_eq!(grid[0].date, date(2025, 2, 24));
        assert_eq!(grid[0].day_number, None);
        let last = grid.last().unwrap();
        assert!(!last.is_current_month);
        assert_eq!(last.date, date(2025, 4, 6));
    }

    #[test]
    fn fevereiro_bissexto_tem_29_dias_reais() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        let reais = month_grid(2024, 2)
            .iter()
            .filter(|c| c.is_current_month)
            .count();
        assert_eq!(reais, 29);
    }

    #[test]
    fn mes_invalido_devolve_grade_vazia() {
        assert!(month_grid(2025, 13).is_empty());
        assert!(month_days(2025, 0).is_empty());
    }
}
