//! Writing-Assistant Gateway
//!
//! Gemini generateContent API 연동. 자격 증명 미설정/호출 실패 시에도
//! 에러를 던지지 않고 항상 표시 가능한 텍스트를 돌려줍니다 (fail-soft).
//! 세션별 대화 히스토리는 프로세스 메모리에만 보관합니다.

pub mod prompt;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::models::{ConversationTurn, ProjectContext};

/// 세션당 보관하는 최대 대화 턴 수 (초과분은 오래된 것부터 제거)
pub const MAX_HISTORY_TURNS: usize = 10;

/// 메모리에 유지하는 최대 세션 수. 초과 시 가장 오래 사용하지 않은 세션 제거.
pub const MAX_SESSIONS: usize = 256;

const UNAVAILABLE_MESSAGE: &str = "抱歉，AI助手暂时不可用。请检查API配置。";
const FAILURE_MESSAGE: &str = "抱歉，处理您的请求时出现了错误。请稍后再试。";

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-pro";

/// 생성 결과. 두 변형 모두 표시 가능한 텍스트로 렌더링됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// 실제 생성된 응답
    Answer(String),
    /// 서비스 저하 시의 고정 안내문
    Degraded(&'static str),
}

impl Generation {
    pub fn into_text(self) -> String {
        match self {
            Generation::Answer(text) => text,
            Generation::Degraded(message) => message.to_string(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Generation::Degraded(_))
    }
}

/// 세션 하나의 히스토리 + LRU 판정용 시퀀스
struct SessionHistory {
    turns: Vec<ConversationTurn>,
    last_used: u64,
}

/// 어시스턴트 게이트웨이 (main에서 생성하여 앱 상태로 주입)
pub struct Assistant {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    history: Mutex<HashMap<String, SessionHistory>>,
    seq: AtomicU64,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl Assistant {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            history: Mutex::new(HashMap::new()),
            seq: AtomicU64::new(0),
        }
    }

    /// 환경 변수로 구성. GEMINI_API_KEY가 없어도 기동은 막지 않습니다.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        if api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY not set. AI features will be limited.");
        }
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(api_key, model)
    }

    /// 프롬프트 조립 → 외부 호출 → 히스토리 기록.
    /// 실패는 Degraded로 흡수되어 호출자는 항상 텍스트를 받습니다.
    pub async fn generate(
        &self,
        user_message: &str,
        context: Option<&ProjectContext>,
        session_id: &str,
    ) -> Generation {
        let Some(api_key) = self.api_key.as_deref() else {
            return Generation::Degraded(UNAVAILABLE_MESSAGE);
        };

        let prompt = prompt::build_prompt(user_message, context);
        match self.call_gemini(api_key, &prompt).await {
            Ok(text) => {
                self.push_turn(session_id, user_message, &text);
                Generation::Answer(text)
            }
            Err(error) => {
                tracing::warn!(%error, "Gemini request failed");
                Generation::Degraded(FAILURE_MESSAGE)
            }
        }
    }

    async fn call_gemini(&self, api_key: &str, prompt: &str) -> Result<String, String> {
        let url = format!("{GEMINI_ENDPOINT}/{}:generateContent", self.model);
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let resp = self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(format!("Gemini API error: {} {}", status.as_u16(), body));
        }

        let data: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| format!("failed to parse response: {e}"))?;

        data.candidates
            .and_then(|mut c| if c.is_empty() { None } else { Some(c.remove(0)) })
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|parts| parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| "empty candidates in response".to_string())
    }

    fn push_turn(&self, session_id: &str, user: &str, ai: &str) {
        let stamp = self.seq.fetch_add(1, Ordering::Relaxed);
        let mut history = self.lock_history();

        // 새 세션이 한도를 넘기면 가장 오래 쓰지 않은 세션부터 비움
        if !history.contains_key(session_id) && history.len() >= MAX_SESSIONS {
            if let Some(oldest) = history
                .iter()
                .min_by_key(|(_, session)| session.last_used)
                .map(|(id, _)| id.clone())
            {
                history.remove(&oldest);
            }
        }

        let session = history
            .entry(session_id.to_string())
            .or_insert_with(|| SessionHistory {
                turns: Vec::new(),
                last_used: stamp,
            });
        session.last_used = stamp;
        session.turns.push(ConversationTurn {
            user: user.to_string(),
            ai: ai.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
        if session.turns.len() > MAX_HISTORY_TURNS {
            let excess = session.turns.len() - MAX_HISTORY_TURNS;
            session.turns.drain(0..excess);
        }
    }

    /// 세션 히스토리 (모르는 세션이면 빈 목록)
    pub fn history(&self, session_id: &str) -> Vec<ConversationTurn> {
        self.lock_history()
            .get(session_id)
            .map(|session| session.turns.clone())
            .unwrap_or_default()
    }

    /// 세션 히스토리 삭제 (모르는 세션이면 no-op)
    pub fn clear_history(&self, session_id: &str) {
        self.lock_history().remove(session_id);
    }

    fn lock_history(&self) -> std::sync::MutexGuard<'_, HashMap<String, SessionHistory>> {
        // 히스토리는 단순 Vec 조작만 하므로 poison 상태여도 복구해 계속 사용
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assistant_without_key() -> Assistant {
        Assistant::new(None, DEFAULT_MODEL.to_string())
    }

    #[tokio::test]
    async fn test_missing_credential_degrades_without_network_call() {
        let assistant = assistant_without_key();
        let result = assistant.generate("你好", None, "default").await;
        assert_eq!(result, Generation::Degraded(UNAVAILABLE_MESSAGE));
        assert_eq!(result.into_text(), "抱歉，AI助手暂时不可用。请检查API配置。");
        // 저하 응답은 히스토리에 남기지 않음
        assert!(assistant.history("default").is_empty());
    }

    #[test]
    fn test_history_fifo_capped_at_ten_turns() {
        let assistant = assistant_without_key();
        for i in 1..=12 {
            assistant.push_turn("s1", &format!("问题{i}"), &format!("回答{i}"));
        }

        let history = assistant.history("s1");
        assert_eq!(history.len(), MAX_HISTORY_TURNS);
        // 가장 오래된 두 턴이 제거되고 원래 순서 유지
        assert_eq!(history[0].user, "问题3");
        assert_eq!(history[9].user, "问题12");
    }

    #[test]
    fn test_history_isolated_per_session() {
        let assistant = assistant_without_key();
        assistant.push_turn("a", "甲", "答甲");
        assistant.push_turn("b", "乙", "答乙");

        assert_eq!(assistant.history("a").len(), 1);
        assert_eq!(assistant.history("b").len(), 1);
        assert!(assistant.history("c").is_empty());
    }

    #[test]
    fn test_session_map_bounded_with_lru_eviction() {
        let assistant = assistant_without_key();
        assistant.push_turn("victim", "旧", "旧答");
        for i in 0..MAX_SESSIONS {
            assistant.push_turn(&format!("s{i}"), "问", "答");
        }

        // 가장 오래 쓰지 않은 세션이 밀려난다
        assert!(assistant.history("victim").is_empty());
        assert_eq!(assistant.history(&format!("s{}", MAX_SESSIONS - 1)).len(), 1);
        // s0은 victim 제거 후에 추가되었으므로 아직 남아 있어야 함
        assert_eq!(assistant.history("s0").len(), 1);
    }

    #[test]
    fn test_clear_history_unknown_session_is_noop() {
        let assistant = assistant_without_key();
        assistant.push_turn("a", "甲", "答甲");
        assistant.clear_history("missing");
        assistant.clear_history("a");
        assert!(assistant.history("a").is_empty());
    }
}
