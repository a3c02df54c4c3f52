// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout plan generation with retry and exponential backoff.

use crate::error::AppError;
use crate::models::{Exercise, WorkoutParams, WorkoutPlan};
use crate::services::gemini::ContentModel;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Total attempts per generate call (first try included).
pub const MAX_ATTEMPTS: u32 = 3;

/// Delay after the first failed attempt; doubles after each further failure.
pub const INITIAL_BACKOFF: Duration = Duration::from_millis(1000);

/// Delay after failed attempt number `attempt` (1-based): 1s, 2s, 4s, ...
pub fn backoff_delay(attempt: u32) -> Duration {
    INITIAL_BACKOFF * 2u32.pow(attempt.saturating_sub(1))
}

/// Builds prompts, calls the model and turns its answer into a plan.
#[derive(Clone)]
pub struct PlanGenerator<M> {
    model: M,
    locale: String,
}

impl<M: ContentModel> PlanGenerator<M> {
    pub fn new(model: M, locale: String) -> Self {
        Self { model, locale }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Generate a plan for `params`.
    ///
    /// Fails immediately with `Configuration` when the model has no
    /// credential. Otherwise makes up to [`MAX_ATTEMPTS`] calls, sleeping
    /// [`backoff_delay`] between them, and returns `Generation` with the last
    /// underlying message once they are exhausted. A plan with zero exercises
    /// is returned as-is.
    pub async fn generate(&self, params: &WorkoutParams) -> Result<WorkoutPlan, AppError> {
        self.model.ensure_configured()?;

        let prompt = self.build_prompt(params);
        let schema = plan_schema();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let err = match self.attempt(&prompt, &schema).await {
                Ok(plan) => {
                    tracing::info!(
                        attempt,
                        name = %plan.name,
                        exercises = plan.exercises.len(),
                        "Workout plan generated"
                    );
                    return Ok(plan);
                }
                Err(e @ AppError::Configuration(_)) => return Err(e),
                Err(e) => e,
            };

            tracing::error!(attempt, error = %err, "Gemini attempt failed");

            if attempt >= MAX_ATTEMPTS {
                return Err(match err {
                    AppError::Generation(msg) => AppError::Generation(msg),
                    other => AppError::Generation(other.to_string()),
                });
            }

            let delay = backoff_delay(attempt);
            tracing::info!(delay_ms = delay.as_millis() as u64, "Retrying plan generation");
            tokio::time::sleep(delay).await;
        }
    }

    async fn attempt(&self, prompt: &str, schema: &Value) -> Result<WorkoutPlan, AppError> {
        let text = self.model.generate_json(prompt, schema).await?;
        let plan = parse_plan(&text)?;
        Ok(tag_generated_ids(plan, Utc::now().timestamp_millis()))
    }

    /// Prompt embedding the user's parameters and the fixed style rules.
    pub fn build_prompt(&self, params: &WorkoutParams) -> String {
        let cardio = if params.include_cardio {
            "YES, add cardio exercises at the start or the end of the session."
        } else {
            "NO, strength training only."
        };

        format!(
            "Create a complete, detailed gym workout.

USER PARAMETERS:
- Main goal: {goal}
- Experience level: {level}
- Available time: {duration}
- Muscle focus: {focus}
- Include cardio: {cardio}

VARIETY RULES:
1. EQUIPMENT MIX IS MANDATORY: combine free weights (dumbbells, barbells), bodyweight \
(calisthenics) and machines. Never build a workout made only of machines or only of free weights.
2. BE SPECIFIC: in the 'equipment' field never write just \"machine\". Name the exact machine \
(for example leg extension, 45-degree leg press, high pulley, Smith machine, pec deck). \
For free weights say dumbbells, Olympic barbell or EZ bar.
3. LANGUAGE: write every exercise name and every text field in {locale}.

RESPONSE:
Return ONLY a JSON object with the workout name and the list of exercises.
For each exercise provide:
- name (in {locale})
- muscle (main muscle group in {locale}, one of: Peito, Costas, Pernas, Abdômen, Braços, Ombros, Cardio)
- sets (suggested number of sets, e.g. 3 or 4)
- reps (text, e.g. \"10-12\", \"Falha\", \"15 min\")
- instructions (short technique cue)
- type (Força, Cardio, Alongamento, Powerlifting)
- equipment (specific, as described above)
- difficulty (optional)",
            goal = params.goal.label(),
            level = params.level.label(),
            duration = params.duration.label(),
            focus = params.target_muscle.label(),
            cardio = cardio,
            locale = self.locale,
        )
    }
}

/// Response schema sent with every request (Gemini OpenAPI subset).
pub fn plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "exercises": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "muscle": { "type": "STRING" },
                        "sets": { "type": "NUMBER" },
                        "reps": { "type": "STRING" },
                        "instructions": { "type": "STRING" },
                        "type": { "type": "STRING" },
                        "equipment": { "type": "STRING" },
                        "difficulty": { "type": "STRING" }
                    },
                    "required": ["name", "muscle", "sets", "reps", "instructions", "equipment"]
                }
            }
        },
        "required": ["name", "exercises"]
    })
}

/// Plan as returned by the model, before ids are assigned.
#[derive(Debug, Deserialize)]
struct GeneratedPlan {
    name: String,
    exercises: Vec<GeneratedExercise>,
}

#[derive(Debug, Deserialize)]
struct GeneratedExercise {
    name: String,
    muscle: String,
    sets: f64,
    reps: String,
    instructions: String,
    equipment: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
}

/// Parse and validate the model's JSON text.
pub fn parse_plan(text: &str) -> Result<WorkoutPlan, AppError> {
    let generated: GeneratedPlan = serde_json::from_str(text.trim())
        .map_err(|e| AppError::Generation(format!("Malformed plan: {}", e)))?;

    if generated.name.trim().is_empty() {
        return Err(AppError::Generation("Plan has no name".to_string()));
    }

    let exercises = generated
        .exercises
        .into_iter()
        .map(|ex| Exercise {
            id: String::new(),
            name: ex.name,
            muscle: ex.muscle,
            equipment: Some(ex.equipment),
            difficulty: ex.difficulty,
            instructions: ex.instructions,
            kind: ex.kind,
            sets: Some(ex.sets.round().max(0.0) as u32),
            reps: Some(ex.reps),
            media_url: None,
        })
        .collect();

    Ok(WorkoutPlan {
        name: generated.name,
        exercises,
    })
}

/// Give every exercise a batch-unique id: `gen-<millis>-<index>`.
pub fn tag_generated_ids(mut plan: WorkoutPlan, timestamp_millis: i64) -> WorkoutPlan {
    for (i, exercise) in plan.exercises.iter_mut().enumerate() {
        exercise.id = format!("gen-{}-{}", timestamp_millis, i);
    }
    plan
}
