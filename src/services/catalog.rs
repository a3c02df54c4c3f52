// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise catalog provider and search.
//!
//! Handles:
//! - Fetching the external exercise list (raw array or `{ "data": [...] }`)
//! - Normalizing English/Portuguese field names into [`Exercise`]
//! - Falling back to a built-in list when the catalog is unavailable
//! - Caching per endpoint, invalidated when the endpoint changes
//! - Filtering by muscle group (with synonyms) and name

use crate::error::AppError;
use crate::models::Exercise;
use dashmap::DashMap;
use serde::Deserialize;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_NAME: &str = "Exercício";
const DEFAULT_MUSCLE: &str = "General";
const DEFAULT_EQUIPMENT: &str = "Livre";
const DEFAULT_DIFFICULTY: &str = "Variado";
const DEFAULT_INSTRUCTIONS: &str = "Sem instruções detalhadas.";
const DEFAULT_KIND: &str = "Força";

/// Shared catalog cache type, keyed by endpoint URL.
///
/// Only successful fetches are cached; the fallback list never is.
#[derive(Clone, Default)]
pub struct CatalogCache {
    entries: Arc<DashMap<String, Arc<Vec<Exercise>>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, endpoint: &str) -> Option<Arc<Vec<Exercise>>> {
        self.entries.get(endpoint).map(|entry| entry.value().clone())
    }

    pub fn insert(&self, endpoint: String, exercises: Arc<Vec<Exercise>>) {
        self.entries.insert(endpoint, exercises);
    }

    /// Drop every cached list.
    pub fn invalidate(&self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Search filters. Empty strings are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    pub muscle: Option<String>,
    pub name: Option<String>,
}

/// Catalog provider with an injectable cache.
#[derive(Clone)]
pub struct CatalogService {
    http: reqwest::Client,
    endpoint: Arc<RwLock<String>>,
    cache: CatalogCache,
}

impl CatalogService {
    /// Create a provider for `endpoint` backed by `cache`.
    pub fn new(endpoint: String, cache: CatalogCache) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: Arc::new(RwLock::new(endpoint)),
            cache,
        }
    }

    /// Currently configured endpoint.
    pub fn endpoint(&self) -> String {
        self.endpoint
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Point the provider at a new endpoint, invalidating the cache if it changed.
    pub fn set_endpoint(&self, endpoint: String) {
        let mut current = self
            .endpoint
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if *current != endpoint {
            tracing::info!(old = %current, new = %endpoint, "Catalog endpoint changed");
            *current = endpoint;
            self.cache.invalidate();
        }
    }

    /// The injected cache.
    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    /// Full catalog, falling back to the built-in list on any failure.
    pub async fn fetch_all(&self) -> Arc<Vec<Exercise>> {
        match self.try_fetch().await {
            Ok(exercises) => exercises,
            Err(e) => e.recover(Arc::new(fallback_exercises()), "Using built-in exercise list"),
        }
    }

    /// Full catalog from the cache or the endpoint, without fallback.
    pub async fn try_fetch(&self) -> Result<Arc<Vec<Exercise>>, AppError> {
        let endpoint = self.endpoint();
        if let Some(cached) = self.cache.get(&endpoint) {
            return Ok(cached);
        }

        tracing::debug!(endpoint = %endpoint, "Fetching exercise catalog");

        let response = self
            .http
            .get(&endpoint)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::CatalogUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::CatalogUnavailable(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::CatalogUnavailable(format!("JSON parse error: {}", e)))?;

        let exercises = Arc::new(normalize_payload(&payload)?);
        tracing::info!(count = exercises.len(), "Exercise catalog loaded");

        // The endpoint may have moved while the request was in flight.
        if self.endpoint() == endpoint {
            self.cache.insert(endpoint, exercises.clone());
        }

        Ok(exercises)
    }

    /// Filter the catalog by muscle group and/or name.
    pub async fn search(&self, query: &CatalogQuery) -> Vec<Exercise> {
        filter_catalog(&self.fetch_all().await, query)
    }

    /// Replacement candidates for `exercise`: same muscle group, other names.
    pub async fn alternatives(&self, exercise: &Exercise, name: Option<String>) -> Vec<Exercise> {
        let query = CatalogQuery {
            muscle: Some(exercise.muscle.clone()),
            name,
        };

        self.search(&query)
            .await
            .into_iter()
            .filter(|candidate| candidate.name != exercise.name)
            .collect()
    }
}

// ─── Search ──────────────────────────────────────────────────

/// Map English muscle-group terms to the catalog's Portuguese vocabulary.
pub fn translate_muscle(term: &str) -> &str {
    match term {
        "chest" => "peito",
        "back" => "costas",
        "legs" => "pernas",
        "shoulders" => "ombros",
        "arms" => "braços",
        "abs" => "abdômen",
        "quadriceps" => "pernas",
        "lats" => "costas",
        "glutes" => "pernas",
        other => other,
    }
}

/// Apply a query to a catalog. Result order follows catalog order.
pub fn filter_catalog(catalog: &[Exercise], query: &CatalogQuery) -> Vec<Exercise> {
    let muscle = query
        .muscle
        .as_deref()
        .filter(|m| !m.is_empty())
        .map(str::to_lowercase);
    let muscle = muscle.as_deref().map(translate_muscle);

    let name = query
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .map(str::to_lowercase);

    catalog
        .iter()
        .filter(|ex| {
            let muscle_ok = muscle.map_or(true, |term| {
                let target = ex.muscle.to_lowercase();
                target.contains(term) || term.contains(target.as_str())
            });
            let name_ok = name
                .as_deref()
                .map_or(true, |term| ex.name.to_lowercase().contains(term));
            muscle_ok && name_ok
        })
        .cloned()
        .collect()
}

// ─── Normalization ───────────────────────────────────────────

/// Turn a catalog payload into exercises.
pub fn normalize_payload(payload: &Value) -> Result<Vec<Exercise>, AppError> {
    let records = match payload {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(AppError::CatalogUnavailable(
                    "payload has no exercise list".to_string(),
                ))
            }
        },
        _ => {
            return Err(AppError::CatalogUnavailable(
                "payload is not a list".to_string(),
            ))
        }
    };

    if records.is_empty() {
        return Err(AppError::CatalogUnavailable(
            "catalog returned an empty list".to_string(),
        ));
    }

    Ok(records.iter().map(normalize_record).collect())
}

/// Normalize one record, accepting either English or Portuguese field names.
fn normalize_record(record: &Value) -> Exercise {
    let instructions = match record.get("instructions") {
        Some(Value::Array(steps)) => steps
            .iter()
            .map(|step| match step {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" "),
        _ => first_text(record, &["instructions", "descricao", "description"])
            .unwrap_or_else(|| DEFAULT_INSTRUCTIONS.to_string()),
    };

    Exercise {
        id: record_id(record).unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string()),
        name: first_text(record, &["name", "nome"]).unwrap_or_else(|| DEFAULT_NAME.to_string()),
        muscle: first_text(record, &["muscle", "grupo_muscular", "muscle_group"])
            .unwrap_or_else(|| DEFAULT_MUSCLE.to_string()),
        equipment: Some(
            first_text(record, &["equipment", "equipamento"])
                .unwrap_or_else(|| DEFAULT_EQUIPMENT.to_string()),
        ),
        difficulty: Some(
            first_text(record, &["difficulty", "dificuldade"])
                .unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string()),
        ),
        instructions,
        kind: Some(DEFAULT_KIND.to_string()),
        sets: None,
        reps: None,
        media_url: first_text(record, &["gifUrl", "imagem", "image"]),
    }
}

/// First non-empty string among `fields`.
fn first_text(record: &Value, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|field| record.get(*field).and_then(Value::as_str))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Source id as a string; numeric ids are stringified, zero counts as missing.
fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

// ─── Fallback ────────────────────────────────────────────────

/// (id, name, muscle, equipment, difficulty, instructions)
const FALLBACK: [(&str, &str, &str, &str, &str, &str); 10] = [
    (
        "1",
        "Supino Reto",
        "Peito",
        "Barra",
        "Intermediário",
        "Deite-se no banco plano. Segure a barra com as mãos um pouco mais afastadas que a largura dos ombros. Desça a barra até tocar o peito e empurre de volta à posição inicial.",
    ),
    (
        "2",
        "Agachamento Livre",
        "Pernas",
        "Barra",
        "Avançado",
        "Coloque a barra sobre os trapézios. Pés na largura dos ombros. Flexione os joelhos e quadril descendo até as coxas ficarem paralelas ao chão. Suba mantendo a coluna reta.",
    ),
    (
        "3",
        "Puxada Frontal",
        "Costas",
        "Máquina",
        "Iniciante",
        "Sentado na máquina, segure a barra com pegada aberta. Puxe a barra em direção ao peito superior, contraindo as escápulas. Retorne controlando o peso.",
    ),
    (
        "4",
        "Desenvolvimento com Halteres",
        "Ombros",
        "Halteres",
        "Intermediário",
        "Sentado, segure um halter em cada mão na altura dos ombros. Empurre os pesos para cima até estender os braços. Desça controladamente.",
    ),
    (
        "5",
        "Rosca Direta",
        "Bíceps",
        "Barra",
        "Iniciante",
        "Em pé, segure a barra com as palmas para frente. Flexione os cotovelos trazendo a barra até a altura do peito. Mantenha os cotovelos fixos ao lado do corpo.",
    ),
    (
        "6",
        "Tríceps Pulley",
        "Tríceps",
        "Cabo",
        "Iniciante",
        "Em pé de frente para a polia alta, segure a barra curta. Estenda os cotovelos empurrando a barra para baixo. Mantenha os cotovelos fixos.",
    ),
    (
        "7",
        "Leg Press 45",
        "Pernas",
        "Máquina",
        "Iniciante",
        "Sente-se no aparelho e coloque os pés na plataforma. Empurre a plataforma estendendo as pernas (sem travar os joelhos) e desça até formar 90 graus.",
    ),
    (
        "8",
        "Abdominal Crunch",
        "Abdômen",
        "Peso do corpo",
        "Iniciante",
        "Deitado de costas, flexione os joelhos. Coloque as mãos atrás da cabeça e flexione o tronco tentando aproximar as costelas do quadril.",
    ),
    (
        "9",
        "Stiff",
        "Posterior de Coxa",
        "Barra",
        "Intermediário",
        "Em pé, segure a barra à frente das coxas. Mantenha as pernas levemente flexionadas e desça o tronco mantendo a coluna reta, levando o quadril para trás.",
    ),
    (
        "10",
        "Elevação Lateral",
        "Ombros",
        "Halteres",
        "Intermediário",
        "Em pé, segure os halteres ao lado do corpo. Eleve os braços lateralmente até a altura dos ombros, com os cotovelos levemente flexionados.",
    ),
];

/// Media for the one built-in entry that carries it: (id, url).
const FALLBACK_MEDIA: (&str, &str) = (
    "1",
    "https://media.giphy.com/media/v1.Y2lkPTc5MGI3NjExNHJ0ZXZ4Y2Z4Y2Z4Y2Z4Y2Z4Y2Z4Y2Z4Y2Z4Y2Z4Y2Z4/3o7TKSjRrfIPjeiVyM/giphy.gif",
);

/// Built-in list used whenever the catalog cannot be fetched.
pub fn fallback_exercises() -> Vec<Exercise> {
    FALLBACK
        .iter()
        .map(
            |&(id, name, muscle, equipment, difficulty, instructions)| Exercise {
                id: id.to_string(),
                name: name.to_string(),
                muscle: muscle.to_string(),
                equipment: Some(equipment.to_string()),
                difficulty: Some(difficulty.to_string()),
                instructions: instructions.to_string(),
                kind: Some(DEFAULT_KIND.to_string()),
                sets: None,
                reps: None,
                media_url: (id == FALLBACK_MEDIA.0).then(|| FALLBACK_MEDIA.1.to_string()),
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const UNREACHABLE: &str = "http://127.0.0.1:9/api.json";

    fn query(muscle: Option<&str>, name: Option<&str>) -> CatalogQuery {
        CatalogQuery {
            muscle: muscle.map(str::to_string),
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_normalize_portuguese_fields() {
        let payload = json!({
            "data": [{
                "id": 42,
                "nome": "Remada Curvada",
                "grupo_muscular": "Costas",
                "equipamento": "Barra",
                "instructions": ["Incline o tronco.", "Puxe a barra."],
                "imagem": "https://cdn.example.com/remada.gif"
            }]
        });

        let exercises = normalize_payload(&payload).unwrap();
        let ex = &exercises[0];
        assert_eq!(ex.id, "42");
        assert_eq!(ex.name, "Remada Curvada");
        assert_eq!(ex.muscle, "Costas");
        assert_eq!(ex.equipment.as_deref(), Some("Barra"));
        assert_eq!(ex.difficulty.as_deref(), Some(DEFAULT_DIFFICULTY));
        assert_eq!(ex.instructions, "Incline o tronco. Puxe a barra.");
        assert_eq!(ex.media(), Some("https://cdn.example.com/remada.gif"));
        assert_eq!(ex.kind.as_deref(), Some(DEFAULT_KIND));
    }

    #[test]
    fn test_normalize_fills_defaults_and_ids() {
        let payload = json!([{ "descricao": "Faça devagar." }, {}]);

        let exercises = normalize_payload(&payload).unwrap();
        assert_eq!(exercises.len(), 2);
        assert_eq!(exercises[0].name, DEFAULT_NAME);
        assert_eq!(exercises[0].muscle, DEFAULT_MUSCLE);
        assert_eq!(exercises[0].instructions, "Faça devagar.");
        assert_eq!(exercises[1].instructions, DEFAULT_INSTRUCTIONS);
        assert!(!exercises[0].id.is_empty());
        assert_ne!(exercises[0].id, exercises[1].id);
    }

    #[test]
    fn test_normalize_rejects_empty_and_malformed() {
        assert!(normalize_payload(&json!([])).is_err());
        assert!(normalize_payload(&json!({ "items": [] })).is_err());
        assert!(normalize_payload(&json!("nope")).is_err());
    }

    #[test]
    fn test_fallback_covers_major_groups() {
        let fallback = fallback_exercises();
        assert_eq!(fallback.len(), 10);
        for muscle in ["Peito", "Costas", "Pernas", "Ombros", "Abdômen"] {
            assert!(fallback.iter().any(|ex| ex.muscle == muscle), "{}", muscle);
        }
        assert!(fallback
            .iter()
            .all(|ex| ex.equipment.is_some() && ex.difficulty.is_some() && !ex.instructions.is_empty()));
    }

    #[test]
    fn test_fallback_bench_press_carries_media() {
        let fallback = fallback_exercises();
        assert_eq!(fallback[0].name, "Supino Reto");
        assert!(fallback[0]
            .media_url
            .as_deref()
            .is_some_and(|url| url.starts_with("https://media.giphy.com/")));
        assert_eq!(fallback.iter().filter(|ex| ex.media_url.is_some()).count(), 1);
    }

    #[test]
    fn test_search_translates_english_muscles() {
        let catalog = fallback_exercises();

        let chest = filter_catalog(&catalog, &query(Some("Chest"), None));
        assert_eq!(chest.len(), 1);
        assert_eq!(chest[0].name, "Supino Reto");

        let legs: Vec<String> = filter_catalog(&catalog, &query(Some("glutes"), None))
            .into_iter()
            .map(|ex| ex.name)
            .collect();
        assert_eq!(legs, vec!["Agachamento Livre", "Leg Press 45"]);
    }

    #[test]
    fn test_search_matches_containment_both_ways() {
        let catalog = fallback_exercises();

        // query inside target
        let coxa = filter_catalog(&catalog, &query(Some("coxa"), None));
        assert_eq!(coxa.len(), 1);

        // target inside query
        let broad = filter_catalog(&catalog, &query(Some("Ombros e Abdômen"), None));
        assert_eq!(broad.len(), 3);
    }

    #[test]
    fn test_search_filters_are_conjunctive() {
        let catalog = fallback_exercises();

        let hits = filter_catalog(&catalog, &query(Some("pernas"), Some("LEG")));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Leg Press 45");

        assert!(filter_catalog(&catalog, &query(Some("peito"), Some("leg"))).is_empty());
        assert_eq!(filter_catalog(&catalog, &query(Some(""), Some(""))).len(), 10);
    }

    #[tokio::test]
    async fn test_fetch_failure_returns_fallback() {
        let service = CatalogService::new(UNREACHABLE.to_string(), CatalogCache::new());

        let exercises = service.fetch_all().await;
        assert_eq!(exercises.len(), 10);
        assert!(service.cache().is_empty());

        let err = service.try_fetch().await.unwrap_err();
        assert!(matches!(err, AppError::CatalogUnavailable(_)));
    }

    #[tokio::test]
    async fn test_endpoint_change_invalidates_cache() {
        let cache = CatalogCache::new();
        let service = CatalogService::new(UNREACHABLE.to_string(), cache.clone());

        let cached = Arc::new(vec![fallback_exercises().remove(0)]);
        cache.insert(UNREACHABLE.to_string(), cached);
        assert_eq!(service.fetch_all().await.len(), 1);

        // Same URL keeps the cache
        service.set_endpoint(UNREACHABLE.to_string());
        assert!(!cache.is_empty());

        service.set_endpoint("http://127.0.0.1:9/other.json".to_string());
        assert!(cache.is_empty());
        assert_eq!(service.fetch_all().await.len(), 10);
    }

    #[tokio::test]
    async fn test_alternatives_exclude_current_exercise() {
        let service = CatalogService::new(UNREACHABLE.to_string(), CatalogCache::new());
        let current = fallback_exercises().remove(3); // Desenvolvimento com Halteres

        let names: Vec<String> = service
            .alternatives(&current, None)
            .await
            .into_iter()
            .map(|ex| ex.name)
            .collect();

        assert_eq!(names, vec!["Elevação Lateral"]);
    }
}
