//! The fixed conjugation of the auxiliary "haber" used to build compound
//! tenses. Static reference data, never mutated.

use crate::Person;

/// One tense of the auxiliary, with `N` forms per person. Every tense is
/// single-form except the subjunctive imperfect, which carries the -ra and
/// -se variants as an ordered pair.
pub struct AuxiliaryTense<const N: usize> {
    pub first_singular: [&'static str; N],
    pub second_singular: [&'static str; N],
    pub third_singular: [&'static str; N],
    pub first_plural: [&'static str; N],
    pub second_plural: [&'static str; N],
    pub third_plural: [&'static str; N],
}

impl<const N: usize> AuxiliaryTense<N> {
    /// Auxiliary forms for a person. The vos slot has no entry of its own;
    /// it is filled from `second_singular` by the normalization pass.
    pub fn forms(&self, person: Person) -> Option<&[&'static str]> {
        match person {
            Person::FirstSingular => Some(&self.first_singular),
            Person::SecondSingular => Some(&self.second_singular),
            Person::SecondSingularVosForm => None,
            Person::ThirdSingular => Some(&self.third_singular),
            Person::FirstPlural => Some(&self.first_plural),
            Person::SecondPlural => Some(&self.second_plural),
            Person::ThirdPlural => Some(&self.third_plural),
        }
    }
}

pub struct HaberTable {
    pub indicative_present: AuxiliaryTense<1>,
    pub indicative_imperfect: AuxiliaryTense<1>,
    pub indicative_future: AuxiliaryTense<1>,
    pub indicative_conditional: AuxiliaryTense<1>,
    pub indicative_preterite: AuxiliaryTense<1>,
    pub subjunctive_present: AuxiliaryTense<1>,
    pub subjunctive_imperfect: AuxiliaryTense<2>,
    pub subjunctive_future: AuxiliaryTense<1>,
}

pub static HABER: HaberTable = HaberTable {
    indicative_present: AuxiliaryTense {
        first_singular: ["he"],
        second_singular: ["has"],
        third_singular: ["ha"],
        first_plural: ["hemos"],
        second_plural: ["habéis"],
        third_plural: ["han"],
    },
    indicative_imperfect: AuxiliaryTense {
        first_singular: ["había"],
        second_singular: ["habías"],
        third_singular: ["había"],
        first_plural: ["habíamos"],
        second_plural: ["habíais"],
        third_plural: ["habían"],
    },
    indicative_future: AuxiliaryTense {
        first_singular: ["habré"],
        second_singular: ["habrás"],
        third_singular: ["habrá"],
        first_plural: ["habremos"],
        second_plural: ["habréis"],
        third_plural: ["habrán"],
    },
    indicative_conditional: AuxiliaryTense {
        first_singular: ["habría"],
        second_singular: ["habrías"],
        third_singular: ["habría"],
        first_plural: ["habríamos"],
        second_plural: ["habríais"],
        third_plural: ["habrían"],
    },
    indicative_preterite: AuxiliaryTense {
        first_singular: ["hube"],
        second_singular: ["hubiste"],
        third_singular: ["hubo"],
        first_plural: ["hubimos"],
        second_plural: ["hubisteis"],
        third_plural: ["hubieron"],
    },
    subjunctive_present: AuxiliaryTense {
        first_singular: ["haya"],
        second_singular: ["hayas"],
        third_singular: ["haya"],
        first_plural: ["hayamos"],
        second_plural: ["hayáis"],
        third_plural: ["hayan"],
    },
    subjunctive_imperfect: AuxiliaryTense {
        first_singular: ["hubiera", "hubiese"],
        second_singular: ["hubieras", "hubieses"],
        third_singular: ["hubiera", "hubiese"],
        first_plural: ["hubiéramos", "hubiésemos"],
        second_plural: ["hubierais", "hubieseis"],
        third_plural: ["hubieran", "hubiesen"],
    },
    subjunctive_future: AuxiliaryTense {
        first_singular: ["hubiere"],
        second_singular: ["hubieres"],
        third_singular: ["hubiere"],
        first_plural: ["hubiéremos"],
        second_plural: ["hubiereis"],
        third_plural: ["huberen"],
    },
};
