//! # Document Assembler
//!
//! Builds each of the three document kinds: header decoration, title,
//! hand-authored Cyrillic body skeleton with the resolved merge fields
//! interpolated, operator contact block, footer rule and, when supplied,
//! a signature image overlaid near the signature line.
//!
//! The body skeletons are fixed template content, not data-driven — lines
//! are pre-wrapped by hand for the renderer.

use std::str::FromStr;

use chrono::Local;

use crate::assets;
use crate::content::ContentLine;
use crate::decor;
use crate::error::BlankiError;
use crate::fields::{self, ClientData, ResolvedFields};
use crate::fonts::FontStore;
use crate::pdf::{self, Surface};

/// Operator requisites, fixed template content.
const OPERATOR_NAME: &str = "Малик Степан Владимирович";
const OPERATOR_SHORT_NAME: &str = "Малик С.В.";
const OPERATOR_INN: &str = "503303222876";
const OPERATOR_ADDRESS: &str = "г. Москва, улица маршала Жукова, дом 53, офис 183";
const OPERATOR_PHONE: &str = "+7 (499) 273-38-29";

const TITLE_SIZE_PT: f32 = 16.0;
const SUBTITLE_SIZE_PT: f32 = 14.0;
/// Title baseline on the first page, just below the header band.
const TITLE_Y_MM: f32 = 264.0;
const TITLE_LINE_STEP_MM: f32 = 7.0;
/// Gap between the title block and the first body line.
const TITLE_BODY_GAP_MM: f32 = 12.0;

/// Signature overlay box, anchored just above the final cursor position
/// (the signature blank is always the last drawn line).
const SIGNATURE_BOX_X_MM: f32 = 62.0;
const SIGNATURE_BOX_W_MM: f32 = 40.0;
const SIGNATURE_BOX_H_MM: f32 = 12.0;

/// The three fixed template categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Loan,
    Consent,
    Refund,
}

impl FromStr for DocumentKind {
    type Err = BlankiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "loan" => Ok(DocumentKind::Loan),
            "consent" => Ok(DocumentKind::Consent),
            "refund" => Ok(DocumentKind::Refund),
            other => Err(BlankiError::InvalidDocumentType(other.to_string())),
        }
    }
}

impl DocumentKind {
    /// Download filename, fixed mapping.
    pub fn filename(&self) -> &'static str {
        match self {
            DocumentKind::Loan => "dogovor-zajma.pdf",
            DocumentKind::Consent => "soglasie-na-obrabotku-dannyh.pdf",
            DocumentKind::Refund => "vozvrat-platezhej.pdf",
        }
    }

    /// Title lines drawn centred under the header band.
    fn title_lines(&self) -> &'static [&'static str] {
        match self {
            DocumentKind::Loan => &["ДОГОВОР ЗАЙМА"],
            DocumentKind::Consent => &["СОГЛАСИЕ НА ОБРАБОТКУ", "ПЕРСОНАЛЬНЫХ ДАННЫХ"],
            DocumentKind::Refund => &["ПОРЯДОК ВОЗВРАТА ПЛАТЕЖЕЙ"],
        }
    }

    /// Only the loan agreement and the consent form carry a signature blank.
    fn has_signature_line(&self) -> bool {
        !matches!(self, DocumentKind::Refund)
    }
}

/// Generate one finalized document for an HTTP request: resolve fields
/// against today's date, decode the optional images, render.
pub fn generate(
    kind: DocumentKind,
    client: &ClientData,
    logo: Option<&str>,
    signature: Option<&str>,
    store: &FontStore,
) -> Result<Vec<u8>, BlankiError> {
    let today = Local::now().date_naive();
    let resolved = fields::resolve(client, today);

    // A bad image must never abort generation; decode failures drop the asset.
    let logo_bytes = logo.and_then(|src| match assets::load_raster(src) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            eprintln!("logo skipped: {}", e);
            None
        }
    });
    let signature_bytes = signature.and_then(|src| match assets::load_raster(src) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            eprintln!("signature skipped: {}", e);
            None
        }
    });

    render(
        kind,
        &resolved,
        logo_bytes.as_deref(),
        signature_bytes.as_deref(),
        store,
    )
}

/// Render a document from already-resolved fields and raw image bytes.
pub fn render(
    kind: DocumentKind,
    resolved: &ResolvedFields,
    logo: Option<&[u8]>,
    signature: Option<&[u8]>,
    store: &FontStore,
) -> Result<Vec<u8>, BlankiError> {
    let mut surface = Surface::new(kind.title_lines()[0], store)?;

    decor::draw_header(&surface, kind, logo);

    surface.set_fill(pdf::HEADING);
    let title_size = if kind.title_lines().len() == 1 {
        TITLE_SIZE_PT
    } else {
        SUBTITLE_SIZE_PT
    };
    let mut title_y = TITLE_Y_MM;
    for line in kind.title_lines() {
        surface.text_bold_centered(line, title_size, title_y);
        title_y -= TITLE_LINE_STEP_MM;
    }

    surface.set_cursor(title_y - TITLE_BODY_GAP_MM + TITLE_LINE_STEP_MM);
    surface.render_lines(&body_lines(kind, resolved));

    // Footer rule under the last content line.
    surface.set_stroke(pdf::BAND_ACCENT, 0.6);
    let rule_y = (surface.cursor() - 2.0).max(pdf::BOTTOM_MARGIN_MM - 10.0);
    surface.line(
        pdf::MARGIN_LEFT_MM,
        rule_y,
        pdf::PAGE_WIDTH_MM - pdf::MARGIN_LEFT_MM,
        rule_y,
    );

    // Purely visual superimposition over the printed signature blank.
    if kind.has_signature_line() {
        if let Some(bytes) = signature {
            if let Err(e) = surface.image_fit(
                bytes,
                SIGNATURE_BOX_X_MM,
                surface.cursor() + 1.0,
                SIGNATURE_BOX_W_MM,
                SIGNATURE_BOX_H_MM,
            ) {
                eprintln!("signature overlay skipped: {}", e);
            }
        }
    }

    surface.finish()
}

/// The ordered body skeleton for one kind with merge fields interpolated.
pub fn body_lines(kind: DocumentKind, f: &ResolvedFields) -> Vec<ContentLine> {
    match kind {
        DocumentKind::Loan => loan_lines(f),
        DocumentKind::Consent => consent_lines(f),
        DocumentKind::Refund => refund_lines(f),
    }
}

fn loan_lines(f: &ResolvedFields) -> Vec<ContentLine> {
    let mut lines = vec![
        ContentLine::normal(format!("г. Москва, {}", f.document_date)),
        ContentLine::gap(),
        ContentLine::normal(format!(
            "Самозанятый {}, ИНН {},",
            OPERATOR_NAME, OPERATOR_INN
        )),
        ContentLine::normal("именуемый в дальнейшем «Займодавец», с одной стороны, и"),
        ContentLine::normal(format!("{},", f.full_name)),
        ContentLine::normal(format!("дата рождения: {},", f.birth_date)),
        ContentLine::normal(format!(
            "паспорт: серия {} номер {},",
            f.passport_series, f.passport_number
        )),
        ContentLine::normal("именуемый в дальнейшем «Заёмщик», с другой стороны,"),
        ContentLine::normal("заключили настоящий договор о нижеследующем:"),
        ContentLine::gap(),
        ContentLine::header("1. ПРЕДМЕТ ДОГОВОРА"),
        ContentLine::gap(),
        ContentLine::normal("1.1. Займодавец передаёт в собственность Заёмщику денежные средства"),
        ContentLine::normal(format!(
            "в сумме {} рублей (заём), а Заёмщик обязуется возвратить",
            f.amount
        )),
        ContentLine::normal("заём и уплатить проценты на него в срок и в порядке, которые"),
        ContentLine::normal("предусмотрены настоящим договором."),
        ContentLine::gap(),
        ContentLine::header("2. УСЛОВИЯ ЗАЙМА"),
        ContentLine::gap(),
        ContentLine::normal(format!("2.1. Сумма займа: {} рублей.", f.amount)),
        ContentLine::normal(format!("2.2. Срок возврата займа: до {}.", f.due_date)),
        ContentLine::normal("2.3. Проценты за пользование займом: 1% в день."),
    ];

    // Derived money lines appear only when both amount and term parsed.
    if let (Some(interest), Some(total)) = (&f.interest, &f.total) {
        lines.push(ContentLine::normal(format!(
            "2.4. Проценты за весь срок пользования займом: {} рублей.",
            interest
        )));
        lines.push(ContentLine::normal(format!(
            "2.5. Итого к возврату: {} рублей.",
            total
        )));
    }

    lines.extend([
        ContentLine::gap(),
        ContentLine::header("3. КОНТАКТНЫЕ ДАННЫЕ ЗАЙМОДАВЦА"),
        ContentLine::gap(),
        ContentLine::contact(format!("Адрес: {}", OPERATOR_ADDRESS)),
        ContentLine::contact(format!("Телефон: {}", OPERATOR_PHONE)),
        ContentLine::contact(format!("ИНН: {}", OPERATOR_INN)),
        ContentLine::gap(),
        ContentLine::header("4. КОНТАКТНЫЕ ДАННЫЕ ЗАЁМЩИКА"),
        ContentLine::gap(),
        ContentLine::contact(format!("Телефон: {}", f.phone)),
        ContentLine::contact(format!("Email: {}", f.email)),
        ContentLine::gap(),
        ContentLine::header("5. ПОДПИСИ СТОРОН"),
        ContentLine::gap(),
        ContentLine::normal(format!(
            "Займодавец: _________________ / {} /",
            OPERATOR_SHORT_NAME
        )),
        ContentLine::gap(),
        ContentLine::normal(format!("Заёмщик: _________________ / {} /", f.full_name)),
    ]);

    lines
}

fn consent_lines(f: &ResolvedFields) -> Vec<ContentLine> {
    vec![
        ContentLine::normal(format!("Я, {},", f.full_name)),
        ContentLine::normal(format!("дата рождения: {},", f.birth_date)),
        ContentLine::normal(format!(
            "паспорт: серия {} номер {},",
            f.passport_series, f.passport_number
        )),
        ContentLine::gap(),
        ContentLine::normal("в соответствии с требованиями ст. 9 Федерального закона от 27.07.2006"),
        ContentLine::normal("№ 152-ФЗ «О персональных данных» даю согласие самозанятому"),
        ContentLine::normal(format!(
            "Малику Степану Владимировичу (ИНН {}) на обработку моих",
            OPERATOR_INN
        )),
        ContentLine::normal("персональных данных."),
        ContentLine::gap(),
        ContentLine::header("ЦЕЛЬ ОБРАБОТКИ ПЕРСОНАЛЬНЫХ ДАННЫХ"),
        ContentLine::gap(),
        ContentLine::normal("- заключение и исполнение договоров"),
        ContentLine::normal("- ведение бухгалтерского и налогового учёта"),
        ContentLine::normal("- информирование о новых услугах"),
        ContentLine::gap(),
        ContentLine::header("ПЕРЕЧЕНЬ ПЕРСОНАЛЬНЫХ ДАННЫХ"),
        ContentLine::gap(),
        ContentLine::normal("- фамилия, имя, отчество"),
        ContentLine::normal("- дата рождения"),
        ContentLine::normal("- адрес регистрации и фактического проживания"),
        ContentLine::normal("- контактные телефоны"),
        ContentLine::normal("- адрес электронной почты"),
        ContentLine::normal("- паспортные данные"),
        ContentLine::gap(),
        ContentLine::normal("Согласие даётся на период действия договорных отношений"),
        ContentLine::normal("и 5 (пять) лет после их окончания."),
        ContentLine::gap(),
        ContentLine::header("КОНТАКТНЫЕ ДАННЫЕ ОПЕРАТОРА"),
        ContentLine::gap(),
        ContentLine::contact(format!("Адрес: {}", OPERATOR_ADDRESS)),
        ContentLine::contact(format!("Телефон: {}", OPERATOR_PHONE)),
        ContentLine::gap(),
        ContentLine::normal(format!("Дата: {}", f.document_date)),
        ContentLine::gap(),
        ContentLine::normal(format!("Подпись: _________________ / {} /", f.full_name)),
    ]
}

fn refund_lines(f: &ResolvedFields) -> Vec<ContentLine> {
    vec![
        ContentLine::contact(format!("Самозанятый: {}", OPERATOR_NAME)),
        ContentLine::contact(format!("ИНН: {}", OPERATOR_INN)),
        ContentLine::contact(format!("Адрес: {}", OPERATOR_ADDRESS)),
        ContentLine::contact(format!("Телефон: {}", OPERATOR_PHONE)),
        ContentLine::gap(),
        ContentLine::header("1. ОСНОВАНИЯ ДЛЯ ВОЗВРАТА"),
        ContentLine::gap(),
        ContentLine::normal("1.1. Возврат платежей осуществляется в следующих случаях:"),
        ContentLine::normal("- ошибочного зачисления средств"),
        ContentLine::normal("- ненадлежащего исполнения обязательств"),
        ContentLine::normal("- в других случаях, предусмотренных законодательством РФ"),
        ContentLine::gap(),
        ContentLine::header("2. ПОРЯДОК ОФОРМЛЕНИЯ ВОЗВРАТА"),
        ContentLine::gap(),
        ContentLine::normal("2.1. Для оформления возврата необходимо:"),
        ContentLine::normal("- написать заявление на возврат с указанием основания"),
        ContentLine::normal("- приложить копии подтверждающих документов"),
        ContentLine::normal("- указать реквизиты для перечисления средств"),
        ContentLine::gap(),
        ContentLine::normal("2.2. Заявление можно подать:"),
        ContentLine::normal(format!("- лично по адресу: {}", OPERATOR_ADDRESS)),
        ContentLine::normal(format!("- по телефону: {}", OPERATOR_PHONE)),
        ContentLine::gap(),
        ContentLine::header("3. СРОКИ ВОЗВРАТА"),
        ContentLine::gap(),
        ContentLine::normal("3.1. Рассмотрение заявления: до 10 рабочих дней."),
        ContentLine::normal("3.2. Перечисление средств: до 10 рабочих дней после принятия"),
        ContentLine::normal("положительного решения."),
        ContentLine::gap(),
        ContentLine::header("4. СПОСОБЫ ВОЗВРАТА"),
        ContentLine::gap(),
        ContentLine::normal("4.1. Возврат осуществляется тем же способом, которым был"),
        ContentLine::normal("проведён платёж, если иное не предусмотрено законодательством"),
        ContentLine::normal("или соглашением сторон."),
        ContentLine::gap(),
        ContentLine::normal("4.2. По желанию заказчика возврат может быть осуществлён"),
        ContentLine::normal("на банковский счёт при предоставлении соответствующих реквизитов."),
        ContentLine::gap(),
        ContentLine::header("5. КОНТАКТЫ ДЛЯ ОБРАЩЕНИЙ"),
        ContentLine::gap(),
        ContentLine::contact(format!("Телефон: {}", f.phone)),
        ContentLine::contact(format!("Email: {}", f.email)),
        ContentLine::gap(),
        ContentLine::normal("Данные условия действуют с момента публикации и до их изменения."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const KINDS: [DocumentKind; 3] = [
        DocumentKind::Loan,
        DocumentKind::Consent,
        DocumentKind::Refund,
    ];

    fn resolved(client: &ClientData) -> ResolvedFields {
        fields::resolve(client, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
    }

    fn contains(lines: &[ContentLine], needle: &str) -> bool {
        lines.iter().any(|l| l.text.contains(needle))
    }

    #[test]
    fn kind_parsing() {
        assert_eq!("loan".parse::<DocumentKind>().unwrap(), DocumentKind::Loan);
        assert_eq!(
            "consent".parse::<DocumentKind>().unwrap(),
            DocumentKind::Consent
        );
        assert_eq!(
            "refund".parse::<DocumentKind>().unwrap(),
            DocumentKind::Refund
        );
        assert!("unknown".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn filenames_are_fixed() {
        assert_eq!(DocumentKind::Loan.filename(), "dogovor-zajma.pdf");
        assert_eq!(
            DocumentKind::Consent.filename(),
            "soglasie-na-obrabotku-dannyh.pdf"
        );
        assert_eq!(DocumentKind::Refund.filename(), "vozvrat-platezhej.pdf");
    }

    #[test]
    fn empty_client_renders_every_kind_with_placeholders() {
        let f = resolved(&ClientData::default());
        for kind in KINDS {
            let lines = body_lines(kind, &f);
            assert!(!lines.is_empty());
            let bytes = render(kind, &f, None, None, &FontStore::builtin()).unwrap();
            assert!(bytes.starts_with(b"%PDF"));
        }
        // placeholder blanks stand in for the absent name
        assert!(contains(
            &body_lines(DocumentKind::Loan, &f),
            "________________________________"
        ));
    }

    #[test]
    fn loan_interpolates_resolved_fields() {
        let client = ClientData {
            full_name: Some("Иванов Иван Иванович".to_string()),
            amount: Some("50000".to_string()),
            term: Some("30".to_string()),
            ..Default::default()
        };
        let f = resolved(&client);
        let lines = body_lines(DocumentKind::Loan, &f);
        assert!(contains(&lines, "Иванов Иван Иванович"));
        assert!(contains(&lines, "50000 рублей"));
        assert!(contains(&lines, "до 31.03.2026"));
        assert!(contains(&lines, "15 000.00 рублей")); // 50000 * 30 * 1%
        assert!(contains(&lines, "65 000.00 рублей"));
    }

    #[test]
    fn loan_omits_derived_lines_when_amount_unparsable() {
        let client = ClientData {
            amount: Some("many".to_string()),
            term: Some("30".to_string()),
            ..Default::default()
        };
        let lines = body_lines(DocumentKind::Loan, &resolved(&client));
        assert!(!contains(&lines, "2.4."));
        assert!(!contains(&lines, "Итого к возврату"));
    }

    #[test]
    fn consent_carries_operator_requisites() {
        let lines = body_lines(DocumentKind::Consent, &resolved(&ClientData::default()));
        assert!(contains(&lines, OPERATOR_INN));
        assert!(contains(&lines, OPERATOR_ADDRESS));
    }

    #[test]
    fn undecodable_signature_still_renders() {
        let f = resolved(&ClientData::default());
        let bytes = render(
            DocumentKind::Loan,
            &f,
            None,
            Some(b"not an image at all"),
            &FontStore::builtin(),
        )
        .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn decodable_signature_and_logo_render() {
        // A real 2x2 PNG produced in memory.
        let mut png = Vec::new();
        let img = image::DynamicImage::new_rgb8(2, 2);
        img.write_to(
            &mut std::io::Cursor::new(&mut png),
            image::ImageFormat::Png,
        )
        .unwrap();

        let f = resolved(&ClientData::default());
        for kind in KINDS {
            let bytes = render(kind, &f, Some(&png), Some(&png), &FontStore::builtin()).unwrap();
            assert!(bytes.starts_with(b"%PDF"));
        }
    }
}
