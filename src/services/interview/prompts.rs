//! Prompt Templates
//!
//! Bilingual prompt builders for every completion the interview services
//! request, plus the localized fallback strings used when model output
//! cannot be decoded.

use crate::models::Language;

use super::selector::QuestionFraming;
use super::session::InterviewContext;

const NOT_PROVIDED_ZH: &str = "未提供";
const NOT_PROVIDED_EN: &str = "Not provided";

fn or_not_provided<'a>(value: Option<&'a str>, language: Language) -> &'a str {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| language.pick(NOT_PROVIDED_ZH, NOT_PROVIDED_EN))
}

// ============================================================================
// Fallback strings
// ============================================================================

pub fn fallback_guidance(language: Language) -> &'static str {
    language.pick(
        "请尝试提供更详细的回答，包括具体的例子和经历。",
        "Try to give a more detailed answer, including concrete examples and experiences.",
    )
}

pub fn fallback_feedback(language: Language) -> &'static str {
    language.pick("已收到您的回答。", "Your answer has been received.")
}

pub fn fallback_bank_question(question_type: &str, language: Language) -> String {
    match language {
        Language::Zh => format!("基于题库内容，请回答一个关于{}的问题。", question_type),
        Language::En => format!(
            "Based on the question bank, please answer a question about {}.",
            question_type
        ),
    }
}

pub fn fallback_synthesized_question(language: Language) -> &'static str {
    language.pick(
        "请做一个简单的自我介绍，并谈谈您为什么适合这个职位。",
        "Please briefly introduce yourself and explain why you are a good fit for this role.",
    )
}

pub fn fallback_next_steps(language: Language) -> &'static str {
    language.pick(
        "建议继续练习，可以开始新的面试轮次",
        "Keep practicing. You can start a new interview round",
    )
}

pub fn fallback_congratulations(language: Language) -> &'static str {
    language.pick(
        "恭喜您完成这次面试！",
        "Congratulations on completing this interview!",
    )
}

pub fn bank_source_label(language: Language) -> &'static str {
    language.pick("题库生成", "question bank")
}

pub fn synthesized_source_label(language: Language) -> &'static str {
    language.pick("AI生成", "generated")
}

// ============================================================================
// Interviewer persona
// ============================================================================

/// System prompt for conversational turns, with attached materials appended.
pub fn interviewer_system_prompt(context: &InterviewContext, language: Language) -> String {
    let mut prompt = match language {
        Language::Zh => "你是一位专业的面试官AI助手。你的职责是：\n\n\
1. 进行模拟面试，根据不同岗位提出相关问题\n\
2. 当用户请求帮助时，提供回答思路和改进建议\n\
3. 如果回答不够完善，不要直接给出答案，而是指出缺少的关键点并引导用户思考\n\
4. 保持专业、友好和鼓励的语调\n\n\
请用中文进行对话。"
            .to_string(),
        Language::En => "You are a professional AI interviewer. Your responsibilities are:\n\n\
1. Conduct mock interviews and ask questions relevant to the position\n\
2. When the user asks for help, explain how to approach the answer and how to improve it\n\
3. If an answer is incomplete, do not give the answer away; point out missing key points and guide the user's thinking\n\
4. Keep a professional, friendly and encouraging tone\n\n\
Please communicate in English."
            .to_string(),
    };

    let sections = [
        (
            context.job_description.as_deref(),
            language.pick("职位描述", "Job Description"),
        ),
        (
            context.resume.as_deref(),
            language.pick("候选人简历", "Candidate Resume"),
        ),
        (
            context.question_bank(),
            language.pick("面试题库", "Interview Question Bank"),
        ),
        (
            context.knowledge_base.as_deref(),
            language.pick("知识库内容", "Knowledge Base"),
        ),
    ];
    let sep = language.pick("：", ":");
    for (content, label) in sections {
        if let Some(content) = content.filter(|c| !c.trim().is_empty()) {
            prompt.push_str(&format!("\n\n{}{}\n{}", label, sep, content));
        }
    }
    prompt
}

// ============================================================================
// Question generation
// ============================================================================

/// Opening line that differs by what the candidate asked for.
pub fn framing_line(framing: QuestionFraming, language: Language) -> &'static str {
    match framing {
        QuestionFraming::Welcome => language.pick(
            "欢迎开始面试！请热情地欢迎候选人，并给出第一个面试问题。",
            "Welcome the candidate warmly to the interview and ask the first question.",
        ),
        QuestionFraming::AvoidRepeats => language.pick(
            "请给出一个新的面试问题，务必避免重复已使用的问题。",
            "Ask a new interview question and make sure it does not repeat any question already used.",
        ),
        QuestionFraming::Neutral => language.pick(
            "请给出一个面试问题。",
            "Ask an interview question.",
        ),
    }
}

pub fn bank_question_prompt(
    framing_line: &str,
    bank_content: &str,
    question_type: &str,
    difficulty: &str,
    exclusions: &[String],
    language: Language,
) -> String {
    let used = if exclusions.is_empty() {
        language.pick("无", "None").to_string()
    } else {
        exclusions.join("\n")
    };
    match language {
        Language::Zh => format!(
            "{framing}\n\n基于以下题库内容，生成1个{difficulty}难度的{question_type}面试问题：\n\n\
题库内容：\n{bank}\n\n\
已使用过的问题（请避免重复，包括语义相近的问题）：\n{used}\n\n\
要求：\n1. 问题应该与题库内容相关\n2. 问题应该具有挑战性和实用性\n\
3. 重要：不要生成已经使用过的问题，确保问题是新的\n\n\
请以JSON格式返回：\n\
{{\"questions\": [{{\"question\": \"问题内容\", \"type\": \"问题类型\", \"difficulty\": \"难度级别\", \"source\": \"题库生成\"}}], \"totalQuestions\": 1}}",
            framing = framing_line,
            difficulty = difficulty,
            question_type = question_type,
            bank = bank_content,
            used = used,
        ),
        Language::En => format!(
            "{framing}\n\nBased on the question bank below, generate 1 {question_type} interview question of {difficulty} difficulty.\n\n\
Question bank:\n{bank}\n\n\
Questions already used (do not repeat them or close paraphrases):\n{used}\n\n\
Requirements:\n1. The question must relate to the question bank\n2. It should be challenging and practical\n\
3. Important: never reuse a question that was already asked\n\n\
Return JSON:\n\
{{\"questions\": [{{\"question\": \"...\", \"type\": \"...\", \"difficulty\": \"...\", \"source\": \"question bank\"}}], \"totalQuestions\": 1}}",
            framing = framing_line,
            difficulty = difficulty,
            question_type = question_type,
            bank = bank_content,
            used = used,
        ),
    }
}

pub fn synthesized_question_prompt(
    framing_line: &str,
    job_description: Option<&str>,
    resume: Option<&str>,
    question_type: &str,
    difficulty: &str,
    exclusions: &[String],
    language: Language,
) -> String {
    let jd = or_not_provided(job_description, language);
    let cv = or_not_provided(resume, language);
    let used = if exclusions.is_empty() {
        language.pick("无", "None").to_string()
    } else {
        exclusions.join("\n")
    };
    match language {
        Language::Zh => format!(
            "{framing}\n\n根据以下信息生成一个{difficulty}难度的{question_type}面试问题：\n\n\
职位描述：{jd}\n简历内容：{cv}\n\n已使用过的问题：\n{used}\n\n\
请生成一个具体、相关且具有挑战性的面试问题。只输出问题本身。",
            framing = framing_line,
            difficulty = difficulty,
            question_type = question_type,
            jd = jd,
            cv = cv,
            used = used,
        ),
        Language::En => format!(
            "{framing}\n\nGenerate one {question_type} interview question of {difficulty} difficulty from the information below.\n\n\
Job description: {jd}\nResume: {cv}\n\nQuestions already used:\n{used}\n\n\
Make it specific, relevant and challenging. Output only the question itself.",
            framing = framing_line,
            difficulty = difficulty,
            question_type = question_type,
            jd = jd,
            cv = cv,
            used = used,
        ),
    }
}

// ============================================================================
// Scoring
// ============================================================================

pub fn default_criteria(language: Language) -> Vec<String> {
    let items: [&str; 4] = match language {
        Language::Zh => [
            "答案的完整性和逻辑性",
            "与职位要求的匹配度",
            "具体性和实例的使用",
            "专业性和技术深度",
        ],
        Language::En => [
            "Completeness and logic of the answer",
            "Fit with the job requirements",
            "Specificity and use of examples",
            "Professionalism and technical depth",
        ],
    };
    items.iter().map(|s| s.to_string()).collect()
}

pub fn scoring_prompt(
    question: &str,
    answer: &str,
    job_description: Option<&str>,
    criteria: &[String],
    language: Language,
) -> String {
    let jd = or_not_provided(job_description, language);
    match language {
        Language::Zh => format!(
            "请评估以下面试答案并提供引导：\n\n问题：{question}\n答案：{answer}\n职位描述：{jd}\n\n\
评估标准：{criteria}\n\n\
请从0-10分进行评分，评分标准：\n\
- 9-10分：回答完整、准确、有深度，包含具体例子，逻辑清晰\n\
- 7-8分：回答基本正确，有一定深度，但可能缺少具体例子\n\
- 5-6分：回答基本正确，但不够详细，缺乏具体例子\n\
- 3-4分：回答部分正确，但不够完整或有明显错误\n\
- 0-2分：回答错误或完全不相关\n\n\
如果回答不够完善，提供具体的引导提示（不要直接给出答案）。\n\n\
请以JSON格式返回：\n\
{{\"score\": 分数, \"feedback\": \"反馈内容\", \"guidance\": \"引导提示\", \"needsImprovement\": true/false, \"accuracyRate\": 准确率百分比}}",
            question = question,
            answer = answer,
            jd = jd,
            criteria = criteria.join("、"),
        ),
        Language::En => format!(
            "Evaluate the following interview answer and provide guidance.\n\nQuestion: {question}\nAnswer: {answer}\nJob description: {jd}\n\n\
Criteria: {criteria}\n\n\
Score from 0 to 10:\n\
- 9-10: complete, accurate and deep, with concrete examples and clear logic\n\
- 7-8: mostly correct with some depth, may lack concrete examples\n\
- 5-6: basically correct but thin, lacking examples\n\
- 3-4: partially correct, incomplete or with clear mistakes\n\
- 0-2: wrong or irrelevant\n\n\
If the answer needs work, give specific hints without revealing the answer.\n\n\
Return JSON:\n\
{{\"score\": number, \"feedback\": \"...\", \"guidance\": \"...\", \"needsImprovement\": true/false, \"accuracyRate\": percentage}}",
            question = question,
            answer = answer,
            jd = jd,
            criteria = criteria.join(", "),
        ),
    }
}

// ============================================================================
// Help
// ============================================================================

pub fn help_prompt(utterance: &str, open_question: Option<&str>, language: Language) -> String {
    let question = or_not_provided(open_question, language);
    match language {
        Language::Zh => format!(
            "当前问题：{}\n\n用户请求帮助：{}。请提供具体的指导和建议，帮助用户更好地回答问题。",
            question, utterance
        ),
        Language::En => format!(
            "Current question: {}\n\nThe user asks for help: {}. Give concrete guidance and suggestions that help the user answer this question better.",
            question, utterance
        ),
    }
}

// ============================================================================
// Summary
// ============================================================================

#[allow(clippy::too_many_arguments)]
pub fn summary_prompt(
    transcript: &str,
    job_description: Option<&str>,
    resume: Option<&str>,
    overall_score: f64,
    accuracy_rate: f64,
    question_count: u32,
    termination_type: &str,
    language: Language,
) -> String {
    let jd = or_not_provided(job_description, language);
    let cv = or_not_provided(resume, language);
    match language {
        Language::Zh => format!(
            "请总结这次面试：\n\n面试对话：\n{transcript}\n\n职位描述：{jd}\n简历：{cv}\n\
整体得分：{score:.1}/10\n准确率：{rate:.1}%\n问题数量：{count}\n终止类型：{kind}\n\n\
请以JSON格式返回：\n\
{{\"summary\": \"面试总结\", \"strengths\": [\"优点1\"], \"weaknesses\": [\"需要改进的地方1\"], \
\"overallScore\": 分数, \"accuracyRate\": 准确率, \"recommendations\": [\"建议1\"], \
\"nextSteps\": \"下一步建议\", \"congratulations\": \"祝贺语\"}}",
            transcript = transcript,
            jd = jd,
            cv = cv,
            score = overall_score,
            rate = accuracy_rate,
            count = question_count,
            kind = termination_type,
        ),
        Language::En => format!(
            "Summarize this interview.\n\nConversation:\n{transcript}\n\nJob description: {jd}\nResume: {cv}\n\
Overall score: {score:.1}/10\nAccuracy: {rate:.1}%\nQuestions: {count}\nTermination type: {kind}\n\n\
Return JSON:\n\
{{\"summary\": \"...\", \"strengths\": [\"...\"], \"weaknesses\": [\"...\"], \
\"overallScore\": number, \"accuracyRate\": number, \"recommendations\": [\"...\"], \
\"nextSteps\": \"...\", \"congratulations\": \"...\"}}",
            transcript = transcript,
            jd = jd,
            cv = cv,
            score = overall_score,
            rate = accuracy_rate,
            count = question_count,
            kind = termination_type,
        ),
    }
}

// ============================================================================
// Evaluation report
// ============================================================================

pub fn evaluation_prompt(
    transcript: &str,
    context: &InterviewContext,
    schema_json: &str,
    language: Language,
) -> String {
    let mut extra = String::new();
    if let Some(jd) = context.job_description.as_deref() {
        extra.push_str(&format!(
            "\n\n{}\n{}",
            language.pick("职位要求：", "Job Requirements:"),
            jd
        ));
    }
    if let Some(resume) = context.resume.as_deref() {
        extra.push_str(&format!(
            "\n\n{}\n{}",
            language.pick("面试者简历：", "Interviewee Resume:"),
            resume
        ));
    }

    match language {
        Language::Zh => format!(
            "请作为资深面试官，对以下面试对话进行全面评估。\n\n面试对话：\n{transcript}{extra}\n\n\
请从技术能力、沟通表达、问题解决、工作态度、相关经验五个维度打分（0-100），\
列出优点和改进建议，并给出录用建议（stronglyRecommend、recommend、average、notRecommend 之一）。\n\n\
只返回符合以下 JSON Schema 的 JSON：\n{schema}",
            transcript = transcript,
            extra = extra,
            schema = schema_json,
        ),
        Language::En => format!(
            "As a senior interviewer, evaluate the following interview conversation.\n\nConversation:\n{transcript}{extra}\n\n\
Score five dimensions from 0 to 100 (technical skills, communication, problem solving, attitude, experience), \
list strengths and improvements, and give a hiring recommendation (one of stronglyRecommend, recommend, average, notRecommend).\n\n\
Return ONLY JSON matching this JSON Schema:\n{schema}",
            transcript = transcript,
            extra = extra,
            schema = schema_json,
        ),
    }
}

pub fn repair_prompt(error: &str) -> String {
    format!(
        "Your previous response could not be parsed as valid JSON.\n\
         Parse error: {}\n\n\
         Please respond with ONLY valid JSON matching the schema.",
        error
    )
}

// ============================================================================
// Question bank parsing
// ============================================================================

pub fn bank_parse_prompt(content: &str, language: Language) -> String {
    match language {
        Language::Zh => format!(
            "请分析以下题库内容，提取所有面试问题和相关信息：\n\n{}\n\n\
请返回以下格式的JSON：\n\
{{\"questions\": [{{\"question\": \"问题内容\", \"answer\": \"答案内容（如果有）\", \"category\": \"问题类别\", \"difficulty\": \"难度级别\"}}], \
\"categories\": [\"类别1\"], \"difficulties\": [\"简单\", \"中等\", \"困难\"]}}\n\n\
如果内容格式不清晰，请尽可能提取出问题和相关信息。",
            content
        ),
        Language::En => format!(
            "Analyze the question bank below and extract every interview question with its details:\n\n{}\n\n\
Return JSON in this shape:\n\
{{\"questions\": [{{\"question\": \"...\", \"answer\": \"... (if any)\", \"category\": \"...\", \"difficulty\": \"...\"}}], \
\"categories\": [\"...\"], \"difficulties\": [\"easy\", \"medium\", \"hard\"]}}\n\n\
If the format is unclear, extract as much as you can.",
            content
        ),
    }
}
