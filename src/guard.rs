/// Every independently wired piece of page behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Subsystem {
    Menu,
    Reveal,
    Ripple,
    Counters,
    SmoothScroll,
    ActiveLink,
    ScrollSpy,
    Images,
    Forms,
    ScrollToTop,
    Header,
    Hover,
    Accordion,
    Privacy,
}

impl Subsystem {
    pub const ALL: [Subsystem; 14] = [
        Subsystem::Menu,
        Subsystem::Reveal,
        Subsystem::Ripple,
        Subsystem::Counters,
        Subsystem::SmoothScroll,
        Subsystem::ActiveLink,
        Subsystem::ScrollSpy,
        Subsystem::Images,
        Subsystem::Forms,
        Subsystem::ScrollToTop,
        Subsystem::Header,
        Subsystem::Hover,
        Subsystem::Accordion,
        Subsystem::Privacy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Subsystem::Menu => "menu",
            Subsystem::Reveal => "reveal",
            Subsystem::Ripple => "ripple",
            Subsystem::Counters => "counters",
            Subsystem::SmoothScroll => "smooth-scroll",
            Subsystem::ActiveLink => "active-link",
            Subsystem::ScrollSpy => "scroll-spy",
            Subsystem::Images => "images",
            Subsystem::Forms => "forms",
            Subsystem::ScrollToTop => "scroll-to-top",
            Subsystem::Header => "header",
            Subsystem::Hover => "hover",
            Subsystem::Accordion => "accordion",
            Subsystem::Privacy => "privacy",
        }
    }
}

/// One-shot wiring flags, one per subsystem. Created once in `main` and
/// handed to the page initializer by reference.
#[derive(Debug, Default)]
pub struct Initializer {
    wired: [bool; Subsystem::ALL.len()],
}

impl Initializer {
    /// Returns `true` exactly once per subsystem: the first caller gets to
    /// wire it, everyone after that gets `false`.
    pub fn claim(&mut self, subsystem: Subsystem) -> bool {
        let flag = &mut self.wired[subsystem as usize];
        if *flag {
            return false;
        }
        *flag = true;
        true
    }

    pub fn is_wired(&self, subsystem: Subsystem) -> bool {
        self.wired[subsystem as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_subsystem_is_claimed_once() {
        let mut init = Initializer::default();
        for subsystem in Subsystem::ALL {
            assert!(!init.is_wired(subsystem));
            assert!(init.claim(subsystem), "{} first claim", subsystem.name());
            assert!(!init.claim(subsystem), "{} second claim", subsystem.name());
            assert!(init.is_wired(subsystem));
        }
    }

    #[test]
    fn claims_are_independent() {
        let mut init = Initializer::default();
        assert!(init.claim(Subsystem::Forms));
        assert!(init.claim(Subsystem::ScrollSpy));
        assert!(!init.is_wired(Subsystem::Reveal));
    }

    #[test]
    fn discriminants_index_all_in_order() {
        for (i, subsystem) in Subsystem::ALL.iter().enumerate() {
            assert_eq!(*subsystem as usize, i);
        }
    }
}
