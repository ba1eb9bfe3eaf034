//! Prompt Rendering
//!
//! 어시스턴트 프롬프트를 순수 문자열 포매팅으로 조립합니다.
//! 외부 호출 없음. 없는 선택 필드는 자리표시자 없이 그냥 생략합니다.

use std::fmt::Write;

use crate::models::ProjectContext;

/// 고정 지시 프리앰블 (중국 고전/무협/현환 집필 어시스턴트 페르소나)
const SYSTEM_PREAMBLE: &str = "你是一位精通中国古典文学、武侠小说和玄幻小说的资深作家助手。你具备以下专业知识：

专业领域：
- 中国历史各朝代的政治、文化、社会制度
- 古典文学作品（四大名著、诗词歌赋等）
- 武侠小说的武功体系、江湖门派、侠义精神
- 玄幻修仙体系（筑基、结丹、元婴等境界）
- 中国神话传说、民间故事、道教佛教文化
- 古代生活方式（服饰、建筑、饮食、礼仪）
- 传统兵器、战术、阵法

助手特点：
- 只在被询问时提供建议，不主动推荐
- 给出概括性建议，让作者可以进一步询问细节
- 理解并记忆重要的故事背景和角色设定
- 保持中文回答，语言风格典雅而易懂";

/// 프롬프트 전문 조립: 프리앰블 + 프로젝트 배경 + 사용자 질문
pub fn build_prompt(user_message: &str, context: Option<&ProjectContext>) -> String {
    format!(
        "{SYSTEM_PREAMBLE}\n\n当前项目背景：\n{}\n\n请根据用户的问题，提供专业而有用的建议。\n\n用户问题：{user_message}",
        format_project_context(context)
    )
}

/// 컨텍스트 스냅샷의 텍스트 렌더링
pub fn format_project_context(context: Option<&ProjectContext>) -> String {
    let Some(context) = context else {
        return "暂无项目背景信息".to_string();
    };

    let mut formatted = String::new();
    let _ = writeln!(formatted, "项目：{}", context.project.name);
    if let Some(description) = context.project.description.as_deref() {
        let _ = writeln!(formatted, "简介：{description}");
    }
    if let Some(genre) = context.project.genre.as_deref() {
        let _ = writeln!(formatted, "类型：{genre}");
    }

    if !context.characters.is_empty() {
        formatted.push_str("\n主要角色：\n");
        for character in &context.characters {
            let _ = writeln!(
                formatted,
                "- {}：{}",
                character.name,
                character.description.as_deref().unwrap_or("暂无描述")
            );
        }
    }

    if let Some(chapter) = &context.current_chapter {
        let _ = writeln!(formatted, "\n当前章节：{}", chapter.title);
        if let Some(summary) = chapter.summary.as_deref() {
            let _ = writeln!(formatted, "章节概要：{summary}");
        }
    }

    if !context.world_building.is_empty() {
        formatted.push_str("\n世界设定：\n");
        for element in &context.world_building {
            let _ = writeln!(
                formatted,
                "- {} ({})：{}",
                element.name,
                element.element_type,
                element.description.as_deref().unwrap_or("暂无描述")
            );
        }
    }

    if formatted.is_empty() {
        "暂无项目背景信息".to_string()
    } else {
        formatted
    }
}

/// 문자열 끝에서 최대 `max_chars` 글자 (char 경계 안전)
pub fn tail_chars(text: &str, max_chars: usize) -> &str {
    let total = text.chars().count();
    if total <= max_chars {
        return text;
    }
    let start = text
        .char_indices()
        .nth(total - max_chars)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &text[start..]
}
