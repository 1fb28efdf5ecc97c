//! Interview Coach - command-line chat
//!
//! Line-oriented mock interview over stdin. Slash commands:
//! `/evaluate`, `/questions [n]`, `/test`, `/reset`, `/help`, `/quit`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use interview_coach::services::connection::probe;
use interview_coach::services::interview::{
    draw, DrawOptions, InterviewContext, InterviewOrchestrator, InterviewSession,
    QuestionBankService,
};
use interview_coach::utils::read_material;
use interview_coach::{ConfigService, Language};
use interview_coach_llm::{LlmProvider, OpenAIProvider};

#[derive(Parser)]
#[command(name = "interview-coach")]
#[command(about = "AI mock interviewer with answer scoring and round summaries")]
struct Args {
    /// Config file (defaults to ~/.interview-coach/config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Interface language: zh or en
    #[arg(long, short = 'l')]
    language: Option<Language>,

    /// Model override
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Question bank text file
    #[arg(long)]
    question_bank: Option<PathBuf>,

    /// Resume text file
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Job description text file
    #[arg(long)]
    job_description: Option<PathBuf>,

    /// Knowledge base text file
    #[arg(long)]
    knowledge_base: Option<PathBuf>,
}

fn load_context(args: &Args) -> Result<InterviewContext> {
    let read = |path: &Option<PathBuf>| -> Result<Option<String>> {
        match path {
            Some(p) => read_material(p).with_context(|| format!("reading {}", p.display())),
            None => Ok(None),
        }
    };

    let mut context = InterviewContext::default();
    if let Some(text) = read(&args.question_bank)? {
        context = context.with_question_bank(text);
    }
    if let Some(text) = read(&args.resume)? {
        context = context.with_resume(text);
    }
    if let Some(text) = read(&args.job_description)? {
        context = context.with_job_description(text);
    }
    if let Some(text) = read(&args.knowledge_base)? {
        context = context.with_knowledge_base(text);
    }
    Ok(context)
}

fn help_text(language: Language) -> &'static str {
    language.pick(
        "命令：/evaluate 生成评估报告，/questions [数量] 从题库抽题，/test 测试连接，/reset 开始新会话，/quit 退出",
        "Commands: /evaluate report, /questions [n] draw from the bank, /test connection, /reset new session, /quit exit",
    )
}

fn apology(language: Language) -> &'static str {
    language.pick(
        "抱歉，处理您的请求时出现了问题，请稍后再试。",
        "Sorry, something went wrong while handling your message. Please try again.",
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_service = match &args.config {
        Some(path) => ConfigService::open(path.clone()),
        None => ConfigService::new(),
    }
    .context("loading configuration")?;

    let mut config = config_service.effective_config()?;
    if let Some(language) = args.language {
        config.language = language;
    }
    if let Some(model) = args.model.clone() {
        config.provider.model = model;
    }
    let language = config.language;

    let provider: Arc<dyn LlmProvider> = Arc::new(
        OpenAIProvider::new(config.provider.to_provider_config())
            .context("creating completion client")?,
    );
    let context = load_context(&args)?;
    let orchestrator = InterviewOrchestrator::new(provider.clone(), config.interview.clone());
    let bank_service = QuestionBankService::new(provider.clone());

    info!(
        config = %config_service.path().display(),
        model = provider.model(),
        language = %language,
        has_question_bank = context.has_question_bank(),
        "interview coach ready"
    );

    let mut session = InterviewSession::new(language, context);
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(format!("{}\n> ", help_text(language)).as_bytes())
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        let reply = match input {
            "" => None,
            "/quit" | "/exit" => break,
            "/help" => Some(help_text(language).to_string()),
            "/reset" => {
                session = session.restart();
                Some(language.pick("已开始新会话。", "Started a new session.").to_string())
            }
            "/test" => Some(probe(provider.as_ref()).await.message),
            "/evaluate" => match orchestrator.evaluate(&session).await {
                Ok(report) => Some(report.render(language)),
                Err(e) => {
                    error!(error = %e, "evaluation failed");
                    Some(apology(language).to_string())
                }
            },
            cmd if cmd.starts_with("/questions") => {
                let count = cmd
                    .trim_start_matches("/questions")
                    .trim()
                    .parse::<usize>()
                    .unwrap_or(5);
                match session.context.question_bank() {
                    None => Some(
                        language
                            .pick("未加载题库。", "No question bank loaded.")
                            .to_string(),
                    ),
                    Some(content) => match bank_service.parse(content, language).await {
                        Ok(bank) => {
                            let options = DrawOptions {
                                count,
                                ..Default::default()
                            };
                            let drawn = draw(&bank, session.tracker().used_questions(), &options);
                            if drawn.is_empty() {
                                Some(
                                    language
                                        .pick("题库中的问题都已使用。", "Every bank question has been used.")
                                        .to_string(),
                                )
                            } else {
                                Some(
                                    drawn
                                        .iter()
                                        .enumerate()
                                        .map(|(i, q)| format!("{}. {}", i + 1, q.question))
                                        .collect::<Vec<_>>()
                                        .join("\n"),
                                )
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "question bank parsing failed");
                            Some(apology(language).to_string())
                        }
                    },
                }
            }
            utterance => {
                if session.is_ended() {
                    session = session.restart();
                }
                match orchestrator.handle_turn(utterance, &session).await {
                    Ok(outcome) => {
                        session = outcome.session;
                        Some(outcome.response_text)
                    }
                    Err(e) => {
                        error!(session_id = %session.id(), error = %e, "turn failed");
                        Some(apology(language).to_string())
                    }
                }
            }
        };

        if let Some(reply) = reply {
            stdout.write_all(format!("\n{}\n", reply).as_bytes()).await?;
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }

    Ok(())
}
