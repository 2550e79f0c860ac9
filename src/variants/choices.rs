//! Choice families shared by the standard vocabulary.
//!
//! Members without an explicit pattern match their lowercased identifier.
//! Order matters only for hydration: the first member whose pattern matches
//! the captured text wins.

choice! {
    pub enum Color: "color" {
        White,
        Blue,
        Black,
        Red,
        Green,
        Colorless,
        Multicolored,
    }
}

choice! {
    /// Nouns that name a game object.
    pub enum ObjectNoun: "object_noun" {
        Creature,
        Artifact,
        Enchantment,
        Land,
        Planeswalker,
        Battle,
        Instant,
        Sorcery,
        Permanent,
        Spell,
        Card,
        Token,
    }
}

choice! {
    pub enum Supertype: "supertype" {
        Basic,
        Legendary,
        Snow,
    }
}

choice! {
    /// Determiners in front of an object reference.
    pub enum Selector: "selector" {
        AnotherTarget => r"another target",
        UpToTarget => r"up to (?:one|two|three|x) target",
        Target,
        Another,
        Each,
        All,
        That,
        Other,
        A => r"an?",
    }
}

choice! {
    pub enum Controller: "controller" {
        YouControl => r"you control",
        YouDontControl => r"you don't control",
        OpponentControls => r"an opponent controls",
        OpponentsControl => r"your opponents control",
    }
}

choice! {
    pub enum Keyword: "keyword" {
        FirstStrike => r"first strike",
        DoubleStrike => r"double strike",
        Flying,
        Trample,
        Haste,
        Vigilance,
        Deathtouch,
        Lifelink,
        Reach,
        Menace,
        Hexproof,
        Indestructible,
        Defender,
        Flash,
        Shroud,
        Prowess,
    }
}

choice! {
    pub enum Zone: "zone" {
        Battlefield,
        Graveyard,
        Hand,
        Library,
        Exile,
        Stack,
    }
}

choice! {
    /// Counts written out in rules text.
    pub enum Quantity: "quantity" {
        A => r"an?",
        One,
        Two,
        Three,
        Four,
        Five,
        Six,
        Seven,
        X,
        Digits => r"\d+",
    }
}

choice! {
    pub enum Player: "player" {
        You,
        TargetPlayer => r"target player",
        TargetOpponent => r"target opponent",
        EachPlayer => r"each player",
        EachOpponent => r"each opponent",
        AnOpponent => r"an opponent",
        ThatPlayer => r"that player",
    }
}

choice! {
    /// Who or what receives damage.
    pub enum Recipient: "recipient" {
        AnyTarget => r"any target",
        TargetCreatureOrPlayer => r"target creature or player",
        TargetCreatureOrPlaneswalker => r"target creature or planeswalker",
        TargetCreature => r"target creature",
        TargetPlayer => r"target player",
        TargetOpponent => r"target opponent",
        EachCreature => r"each creature",
        EachOpponent => r"each opponent",
        EachPlayer => r"each player",
    }
}

choice! {
    pub enum Action: "action" {
        Destroy,
        Exile,
        Sacrifice,
        Tap,
        Untap,
        Counter,
    }
}

choice! {
    pub enum LifeDirection: "life_direction" {
        Gain => r"gains?",
        Lose => r"loses?",
    }
}

choice! {
    pub enum EffectDuration: "duration" {
        UntilEndOfTurn => r"until end of turn",
        UntilYourNextTurn => r"until your next turn",
    }
}

choice! {
    pub enum CounterKind: "counter_kind" {
        PlusOne => r"\+1/\+1",
        MinusOne => r"-1/-1",
        Loyalty,
        Charge,
        Time,
        Shield,
    }
}

choice! {
    pub enum Timing: "timing" {
        Whenever,
        When,
    }
}

choice! {
    pub enum TriggerEvent: "trigger_event" {
        Enters => r"enters(?: the battlefield)?",
        Dies,
        Attacks,
        Blocks,
        BecomesBlocked => r"becomes blocked",
        DealsCombatDamage => r"deals combat damage to a player",
        CastsSpell => r"casts? an? spell",
    }
}

choice! {
    /// Whose step a phase trigger refers to.
    pub enum StepOwner: "step_owner" {
        EachOpponents => r"each opponent's",
        EachPlayers => r"each player's",
        ThatPlayers => r"that player's",
        Your,
        Each,
        The,
    }
}

choice! {
    pub enum Step: "step" {
        Upkeep,
        DrawStep => r"draw step",
        EndStep => r"end step",
        Combat,
        PrecombatMain => r"precombat main phase",
    }
}
