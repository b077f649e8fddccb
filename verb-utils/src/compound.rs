//! Derivation of compound tenses from the haber table and a verb's
//! participles.
//!
//! Every compound form is `"{auxiliary} {participle}"`. Most tenses pair the
//! single auxiliary form with the primary participle only; the preterite
//! anterior fans out over all participles, and the subjunctive pluperfect
//! additionally fans out over the -ra/-se auxiliary pair.

use crate::haber::{AuxiliaryTense, HABER};
use crate::{MoodBlock, Person, TenseSlot, VerbRecord};

/// Overwrite `compound_indicative` and `compound_subjunctive` on the record.
/// A record without participles is left unchanged.
pub fn add_compound_tenses(record: &mut VerbRecord) {
    let participles = &record.participles;
    if participles.is_empty() {
        return;
    }

    let mut indicative = MoodBlock::default();
    indicative.insert(
        "preterite_perfect",
        compose(&HABER.indicative_present, participles, false),
    );
    indicative.insert(
        "pluperfect",
        compose(&HABER.indicative_imperfect, participles, false),
    );
    indicative.insert(
        "future_perfect",
        compose(&HABER.indicative_future, participles, false),
    );
    indicative.insert(
        "conditional_perfect",
        compose(&HABER.indicative_conditional, participles, false),
    );
    indicative.insert(
        "preterite_anterior",
        compose(&HABER.indicative_preterite, participles, true),
    );

    let mut subjunctive = MoodBlock::default();
    subjunctive.insert(
        "preterite_perfect",
        compose(&HABER.subjunctive_present, participles, false),
    );
    subjunctive.insert(
        "pluperfect",
        compose(&HABER.subjunctive_imperfect, participles, true),
    );
    subjunctive.insert(
        "future_perfect",
        compose(&HABER.subjunctive_future, participles, false),
    );

    record.compound_indicative = indicative;
    record.compound_subjunctive = subjunctive;
}

/// Build one compound tense. Participles iterate as the outer loop and
/// auxiliary forms as the inner loop, so a two-participle subjunctive
/// pluperfect reads `[ra P0, se P0, ra P1, se P1]`. The vos slot is left
/// empty for the normalization fallback.
fn compose<const N: usize>(
    auxiliary: &AuxiliaryTense<N>,
    participles: &[String],
    all_participles: bool,
) -> TenseSlot {
    let mut slot = TenseSlot {
        regular: participles.len() == 1,
        ..TenseSlot::default()
    };
    let used = if all_participles {
        participles
    } else {
        &participles[..1]
    };
    for person in Person::ALL {
        let Some(auxiliary_forms) = auxiliary.forms(person) else {
            continue;
        };
        let forms = slot.forms_mut(person);
        for participle in used {
            for auxiliary_form in auxiliary_forms {
                forms.push(format!("{auxiliary_form} {participle}"));
            }
        }
    }
    slot
}
